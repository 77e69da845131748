//! Repository layer for contact records.
//!
//! # Responsibility
//! - Define the identity-keyed data access contract.
//! - Keep uniqueness of identities inside one owner object.
//!
//! # Invariants
//! - At most one record exists per `ContactId`.
//! - Renames never expose a state where both or neither key is present.

pub mod directory;
