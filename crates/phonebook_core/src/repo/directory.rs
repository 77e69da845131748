//! Identity-keyed contact repository and its in-memory implementation.
//!
//! # Responsibility
//! - Provide get/put/remove/rename over contacts keyed by `ContactId`.
//! - Hold the whole directory in memory for the process lifetime.
//!
//! # Invariants
//! - Keys are validated `ContactId` values by construction.
//! - `all()` order is ascending by `(name, surname)` and stable.
//! - `rename` is a single `&mut self` call; no intermediate state is observable.

use crate::model::contact::{Contact, ContactId};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for identity-targeted operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(ContactId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Repository interface for contact storage keyed by identity.
pub trait ContactRepository {
    fn get(&self, id: &ContactId) -> Option<&Contact>;
    fn contains(&self, id: &ContactId) -> bool;
    /// Inserts or overwrites; returns the previous record under `id`.
    fn put(&mut self, id: ContactId, contact: Contact) -> Option<Contact>;
    /// Returns `true` when a record existed and was removed.
    fn remove(&mut self, id: &ContactId) -> bool;
    /// Moves the record at `old` to `new`, storing `contact` as its value.
    ///
    /// Returns the record that previously occupied `new` when `new` held a
    /// different contact.
    fn rename(
        &mut self,
        old: &ContactId,
        new: ContactId,
        contact: Contact,
    ) -> RepoResult<Option<Contact>>;
    fn all(&self) -> Vec<(ContactId, Contact)>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory directory owned explicitly by its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: BTreeMap<ContactId, Contact>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrowing iterator in `all()` order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContactId, &Contact)> {
        self.entries.iter()
    }
}

impl FromIterator<(ContactId, Contact)> for Directory {
    fn from_iter<T: IntoIterator<Item = (ContactId, Contact)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ContactRepository for Directory {
    fn get(&self, id: &ContactId) -> Option<&Contact> {
        self.entries.get(id)
    }

    fn contains(&self, id: &ContactId) -> bool {
        self.entries.contains_key(id)
    }

    fn put(&mut self, id: ContactId, contact: Contact) -> Option<Contact> {
        self.entries.insert(id, contact)
    }

    fn remove(&mut self, id: &ContactId) -> bool {
        self.entries.remove(id).is_some()
    }

    fn rename(
        &mut self,
        old: &ContactId,
        new: ContactId,
        contact: Contact,
    ) -> RepoResult<Option<Contact>> {
        if !self.entries.contains_key(old) {
            return Err(RepoError::NotFound(old.clone()));
        }

        if *old == new {
            self.entries.insert(new, contact);
            return Ok(None);
        }

        self.entries.remove(old);
        Ok(self.entries.insert(new, contact))
    }

    fn all(&self) -> Vec<(ContactId, Contact)> {
        self.entries
            .iter()
            .map(|(id, contact)| (id.clone(), contact.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
