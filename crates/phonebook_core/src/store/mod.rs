//! Directory persistence.
//!
//! # Responsibility
//! - Convert the in-memory directory to and from its JSON file form.
//! - Load once at startup and rewrite the whole file after mutations.
//!
//! # Invariants
//! - A missing file loads as an empty directory.
//! - A file that is not valid JSON, or holds invalid records, is never
//!   silently discarded; loading fails with `StoreError::Corrupt`.

pub mod json;
