//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical identity and record shapes used by core logic.
//! - Own the validation and normalization rules for every contact field.
//!
//! # Invariants
//! - A `ContactId` is always canonically capitalized and charset-checked.
//! - A `Phone` is always 11 ASCII digits starting with `8`.
//! - A `BirthDate` always denotes a real calendar date.

pub mod contact;
