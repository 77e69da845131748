//! Contact use-case service.
//!
//! # Responsibility
//! - Provide list/search/add/delete/update/age entry points for the menu.
//! - Persist the full directory after every successful mutation.
//!
//! # Invariants
//! - The directory is owned by the service instance, never by a global.
//! - `add` never overwrites; overwriting goes through `replace` or `update`.
//! - Failed lookups leave both memory and file untouched.
//! - A mutation whose save fails is rolled back, so memory never runs ahead
//!   of the file.

use crate::model::contact::{
    BirthDate, Contact, ContactId, ContactValidationError, Phone,
};
use crate::repo::directory::{ContactRepository, Directory, RepoError};
use crate::search::criteria::{search, SearchCriteria};
use crate::service::age::age_of;
use crate::store::json::{DirectoryStore, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Add targeted an identity that already has a record.
    DuplicateIdentity(ContactId),
    /// Target identity has no record.
    RecordNotFound(ContactId),
    /// Age requested for a contact without a birth date.
    MissingDob(ContactId),
    Validation(ContactValidationError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateIdentity(id) => write!(f, "contact already exists: {id}"),
            Self::RecordNotFound(id) => write!(f, "contact not found: {id}"),
            Self::MissingDob(id) => write!(f, "date of birth is not specified for {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::RecordNotFound(id),
        }
    }
}

impl From<ContactValidationError> for ServiceError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Partial update; `None` fields keep their current value.
///
/// `name` and `surname` are raw components and are validated when the new
/// identity is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<Phone>,
    pub dob: Option<BirthDate>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.phone.is_none() && self.dob.is_none()
    }
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Identity the record lives under after the update.
    pub id: ContactId,
    pub contact: Contact,
    /// Record that previously occupied `id` when the update renamed onto an
    /// existing, different contact.
    pub displaced: Option<Contact>,
}

/// Contact service owning the directory and its store.
pub struct ContactService<S: DirectoryStore> {
    directory: Directory,
    store: S,
}

impl<S: DirectoryStore> ContactService<S> {
    /// Loads the directory from `store`.
    ///
    /// # Errors
    /// - Propagates `StoreError::Corrupt`; callers must not continue with an
    ///   empty directory in that case.
    pub fn open(store: S) -> ServiceResult<Self> {
        let directory = store.load()?;
        Ok(Self { directory, store })
    }

    /// Wraps an already-loaded directory without touching the store.
    pub fn with_directory(directory: Directory, store: S) -> Self {
        Self { directory, store }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: &ContactId) -> Option<&Contact> {
        self.directory.get(id)
    }

    pub fn contains(&self, id: &ContactId) -> bool {
        self.directory.contains(id)
    }

    /// Lists every contact in directory order.
    pub fn list(&self) -> Vec<(ContactId, Contact)> {
        self.directory.all()
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Vec<(ContactId, Contact)> {
        let hits = search(&self.directory, criteria);
        info!(
            "event=contact_search module=service status=ok hits={} total={}",
            hits.len(),
            self.directory.len()
        );
        hits
    }

    /// Adds a new contact.
    ///
    /// # Errors
    /// - `DuplicateIdentity` when `id` already exists; nothing is written.
    /// - `Store` when saving fails; the directory is rolled back.
    pub fn add(&mut self, id: ContactId, contact: Contact) -> ServiceResult<()> {
        if self.directory.contains(&id) {
            info!("event=contact_add module=service status=rejected reason=duplicate_identity");
            return Err(ServiceError::DuplicateIdentity(id));
        }

        let snapshot = self.directory.clone();
        self.directory.put(id, contact);
        self.commit("contact_add", snapshot)
    }

    /// Inserts or overwrites the record under `id`.
    ///
    /// Returns the overwritten record, if any.
    ///
    /// # Errors
    /// - `Store` when saving fails; the directory is rolled back.
    pub fn replace(&mut self, id: ContactId, contact: Contact) -> ServiceResult<Option<Contact>> {
        let snapshot = self.directory.clone();
        let previous = self.directory.put(id, contact);
        self.commit("contact_replace", snapshot)?;
        Ok(previous)
    }

    /// Deletes a contact and returns the removed record.
    ///
    /// # Errors
    /// - `RecordNotFound` when `id` is absent; the directory is unchanged.
    /// - `Store` when saving fails; the directory is rolled back.
    pub fn delete(&mut self, id: &ContactId) -> ServiceResult<Contact> {
        let Some(removed) = self.directory.get(id).cloned() else {
            info!("event=contact_delete module=service status=not_found");
            return Err(ServiceError::RecordNotFound(id.clone()));
        };

        let snapshot = self.directory.clone();
        self.directory.remove(id);
        self.commit("contact_delete", snapshot)?;
        Ok(removed)
    }

    /// Applies `patch` to the contact at `id`, renaming it when the name or
    /// surname changes.
    ///
    /// # Errors
    /// - `RecordNotFound` when `id` is absent.
    /// - `Validation` when a patched name component is invalid.
    /// - `Store` when saving fails; the directory is rolled back.
    pub fn update(&mut self, id: &ContactId, patch: ContactPatch) -> ServiceResult<UpdateOutcome> {
        let current = self
            .directory
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::RecordNotFound(id.clone()))?;

        let new_id = ContactId::new(
            patch.name.as_deref().unwrap_or(id.name()),
            patch.surname.as_deref().unwrap_or(id.surname()),
        )?;
        let contact = Contact {
            phone: patch.phone.unwrap_or(current.phone),
            dob: patch.dob.or(current.dob),
        };

        let snapshot = self.directory.clone();
        let displaced = self
            .directory
            .rename(id, new_id.clone(), contact.clone())?;
        if displaced.is_some() {
            warn!("event=contact_update module=service status=ok displaced_existing=true");
        }
        self.commit("contact_update", snapshot)?;

        Ok(UpdateOutcome {
            id: new_id,
            contact,
            displaced,
        })
    }

    /// Returns the age in whole years of the contact at `id` as of `today`.
    pub fn age(&self, id: &ContactId, today: NaiveDate) -> ServiceResult<i32> {
        let contact = self
            .directory
            .get(id)
            .ok_or_else(|| ServiceError::RecordNotFound(id.clone()))?;

        age_of(contact.dob, today).map_err(|_| ServiceError::MissingDob(id.clone()))
    }

    /// Writes the full directory to the store.
    pub fn save(&self) -> ServiceResult<()> {
        self.store.save(&self.directory)?;
        Ok(())
    }

    /// Saves the mutated directory, restoring `snapshot` if the save fails.
    fn commit(&mut self, event: &str, snapshot: Directory) -> ServiceResult<()> {
        if let Err(err) = self.save() {
            self.directory = snapshot;
            warn!(
                "event={event} module=service status=error error_code=save_failed rolled_back=true"
            );
            return Err(err);
        }
        info!(
            "event={event} module=service status=ok count={}",
            self.directory.len()
        );
        Ok(())
    }
}
