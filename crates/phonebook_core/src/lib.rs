//! Core domain logic for the phonebook.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{default_log_level, ConfigError, PhonebookConfig, DEFAULT_STORE_FILE};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::contact::{
    canonicalize_component, normalize_identity_component, normalize_phone, validate_dob,
    validate_identity_component, BirthDate, Contact, ContactId, ContactValidationError, Phone,
};
pub use repo::directory::{ContactRepository, Directory, RepoError, RepoResult};
pub use search::criteria::{search, SearchCriteria};
pub use service::age::{age, age_of, AgeError};
pub use service::contact_service::{
    ContactPatch, ContactService, ServiceError, ServiceResult, UpdateOutcome,
};
pub use store::json::{
    decode, encode, DirectoryStore, JsonFileStore, StoreError, StoreResult, WireContact,
    WireDirectory,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
