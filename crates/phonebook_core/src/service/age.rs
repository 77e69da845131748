//! Whole-years age derived from a birth date.
//!
//! A birth date later than `today` yields a negative age; it is not clamped.

use crate::model::contact::{BirthDate, ContactValidationError};
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Age computation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeError {
    /// Birth date is unknown.
    MissingDob,
    InvalidDob(ContactValidationError),
}

impl Display for AgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDob => write!(f, "date of birth is not specified"),
            Self::InvalidDob(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingDob => None,
            Self::InvalidDob(err) => Some(err),
        }
    }
}

/// Computes age from `dd.mm.yyyy` text; empty text means unknown.
pub fn age(dob: &str, today: NaiveDate) -> Result<i32, AgeError> {
    let dob = match dob.trim() {
        "" => None,
        text => Some(BirthDate::parse(text).map_err(AgeError::InvalidDob)?),
    };
    age_of(dob, today)
}

/// Computes age in whole years, subtracting one when this year's birthday
/// has not been reached yet.
pub fn age_of(dob: Option<BirthDate>, today: NaiveDate) -> Result<i32, AgeError> {
    let born = dob.ok_or(AgeError::MissingDob)?.date();
    let birthday_pending = (today.month(), today.day()) < (born.month(), born.day());
    Ok(today.year() - born.year() - i32::from(birthday_pending))
}
