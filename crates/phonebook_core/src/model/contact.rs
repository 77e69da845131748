//! Contact identity, record and field validators.
//!
//! # Responsibility
//! - Validate and canonicalize name/surname components.
//! - Normalize phone numbers to the 11-digit national form.
//! - Parse and render birth dates in strict `dd.mm.yyyy` form.
//!
//! # Invariants
//! - Constructors are the only way to obtain `ContactId`, `Phone` and
//!   `BirthDate`, so every stored value has passed validation.
//! - `BirthDate` renders back to exactly the text it was parsed from.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required length of a normalized phone number.
pub const PHONE_LEN: usize = 11;
/// chrono format string for the `dd.mm.yyyy` birth date form.
pub const DOB_FORMAT: &str = "%d.%m.%Y";

const INTERNATIONAL_PREFIX: &str = "+7";
const NATIONAL_PREFIX: char = '8';

static IDENTITY_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9[:space:]]+$").expect("valid identity component regex")
});
static DOB_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("valid dob regex"));

/// Validation failure for a single contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Name or surname is empty or contains characters outside
    /// ASCII letters, digits and whitespace.
    InvalidIdentityComponent(String),
    /// Phone is not 11 digits starting with `8` after prefix normalization.
    InvalidPhone(String),
    /// Birth date is not a real calendar date in `dd.mm.yyyy` form.
    InvalidDob(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentityComponent(value) => write!(
                f,
                "invalid name component `{value}`: only latin letters, digits and spaces are allowed"
            ),
            Self::InvalidPhone(value) => write!(
                f,
                "invalid phone `{value}`: expected 11 digits starting with `+7` or `8`"
            ),
            Self::InvalidDob(value) => write!(
                f,
                "invalid date of birth `{value}`: expected an existing date as dd.mm.yyyy"
            ),
        }
    }
}

impl Error for ContactValidationError {}

/// Returns whether `text` is a non-empty run of ASCII letters, digits and
/// whitespace.
pub fn validate_identity_component(text: &str) -> bool {
    IDENTITY_COMPONENT_RE.is_match(text)
}

/// Upper-cases the first character and lower-cases the remainder.
///
/// Applies to the whole component, so `"mary ANN"` becomes `"Mary ann"`.
pub fn canonicalize_component(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalizes a raw phone number to the national 11-digit form.
///
/// A leading `+7` is replaced with `8`. Normalizing an already-normalized
/// number returns it unchanged.
///
/// # Errors
/// - `InvalidPhone` when the result is not 11 ASCII digits starting with `8`.
pub fn normalize_phone(raw: &str) -> Result<String, ContactValidationError> {
    let candidate = match raw.strip_prefix(INTERNATIONAL_PREFIX) {
        Some(rest) => format!("{NATIONAL_PREFIX}{rest}"),
        None => raw.to_string(),
    };

    let well_formed = candidate.len() == PHONE_LEN
        && candidate.starts_with(NATIONAL_PREFIX)
        && candidate.bytes().all(|byte| byte.is_ascii_digit());
    if !well_formed {
        return Err(ContactValidationError::InvalidPhone(raw.to_string()));
    }

    Ok(candidate)
}

/// Returns whether `text` is a real calendar date in strict `dd.mm.yyyy` form.
pub fn validate_dob(text: &str) -> bool {
    BirthDate::parse(text).is_ok()
}

/// Unique key of a contact: canonical `(name, surname)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId {
    name: String,
    surname: String,
}

impl ContactId {
    /// Builds an identity from raw user input.
    ///
    /// Both components are trimmed and canonicalized before validation.
    ///
    /// # Errors
    /// - `InvalidIdentityComponent` for the first component that is empty or
    ///   contains disallowed characters.
    pub fn new(
        name: impl AsRef<str>,
        surname: impl AsRef<str>,
    ) -> Result<Self, ContactValidationError> {
        Ok(Self {
            name: normalize_identity_component(name.as_ref())?,
            surname: normalize_identity_component(surname.as_ref())?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.surname)
    }
}

/// Trims, canonicalizes and validates one name or surname component.
pub fn normalize_identity_component(raw: &str) -> Result<String, ContactValidationError> {
    let canonical = canonicalize_component(raw.trim());
    if !validate_identity_component(&canonical) {
        return Err(ContactValidationError::InvalidIdentityComponent(
            raw.to_string(),
        ));
    }
    Ok(canonical)
}

/// Normalized phone number: 11 ASCII digits, first digit `8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    /// Trims and normalizes raw input via [`normalize_phone`].
    pub fn parse(raw: &str) -> Result<Self, ContactValidationError> {
        normalize_phone(raw.trim()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known date of birth.
///
/// Unknown birth dates are modeled as `Option<BirthDate>::None` on
/// [`Contact`], never as an empty value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Parses strict `dd.mm.yyyy` text into a real calendar date.
    ///
    /// # Errors
    /// - `InvalidDob` for wrong shape (`1.2.1990`, `01-02-1990`) or a date
    ///   that does not exist (`31.02.2020`).
    pub fn parse(text: &str) -> Result<Self, ContactValidationError> {
        let invalid = || ContactValidationError::InvalidDob(text.to_string());
        if !DOB_SHAPE_RE.is_match(text) {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(text, DOB_FORMAT).map_err(|_| invalid())?;
        if date.year() < 1 {
            return Err(invalid());
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<BirthDate> for NaiveDate {
    fn from(value: BirthDate) -> Self {
        value.0
    }
}

impl Display for BirthDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DOB_FORMAT))
    }
}

/// Stored attributes of one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub phone: Phone,
    /// `None` means the birth date is unknown.
    pub dob: Option<BirthDate>,
}

impl Contact {
    pub fn new(phone: Phone, dob: Option<BirthDate>) -> Self {
        Self { phone, dob }
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_component, normalize_phone, BirthDate, ContactValidationError};

    #[test]
    fn canonicalize_component_lowers_tail() {
        assert_eq!(canonicalize_component("iVAN"), "Ivan");
        assert_eq!(canonicalize_component("mary ANN"), "Mary ann");
        assert_eq!(canonicalize_component(""), "");
    }

    #[test]
    fn normalize_phone_reports_raw_input() {
        let err = normalize_phone("+7999").unwrap_err();
        assert_eq!(err, ContactValidationError::InvalidPhone("+7999".to_string()));
    }

    #[test]
    fn birth_date_renders_zero_padded() {
        let dob = BirthDate::parse("01.02.0990").unwrap();
        assert_eq!(dob.to_string(), "01.02.0990");
    }
}
