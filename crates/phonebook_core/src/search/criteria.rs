//! Criteria-based contact filtering.
//!
//! # Invariants
//! - Empty or whitespace-only criteria are ignored.
//! - All-empty criteria match every record exactly once.
//! - Result order follows `ContactRepository::all()`.

use crate::model::contact::{Contact, ContactId};
use crate::repo::directory::ContactRepository;

/// Optional per-field filter.
///
/// `phone` and `dob` are compared verbatim against stored values; callers
/// normalize phone input beforehand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
}

impl SearchCriteria {
    /// Criteria matching every record.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        [&self.name, &self.surname, &self.phone, &self.dob]
            .into_iter()
            .all(|field| active(field).is_none())
    }

    /// Returns whether one record satisfies every active criterion.
    pub fn matches(&self, id: &ContactId, contact: &Contact) -> bool {
        let name_ok = active(&self.name).map_or(true, |name| id.name().eq_ignore_ascii_case(name));
        let surname_ok = active(&self.surname)
            .map_or(true, |surname| id.surname().eq_ignore_ascii_case(surname));
        let phone_ok = active(&self.phone).map_or(true, |phone| contact.phone.as_str() == phone);
        let dob_ok = active(&self.dob).map_or(true, |dob| {
            contact
                .dob
                .is_some_and(|stored| stored.to_string() == dob)
        });

        name_ok && surname_ok && phone_ok && dob_ok
    }
}

fn active(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Returns records matching `criteria`, in repository order.
pub fn search<R: ContactRepository + ?Sized>(
    repo: &R,
    criteria: &SearchCriteria,
) -> Vec<(ContactId, Contact)> {
    repo.all()
        .into_iter()
        .filter(|(id, contact)| criteria.matches(id, contact))
        .collect()
}
