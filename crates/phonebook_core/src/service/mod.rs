//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, search and persistence calls into
//!   menu-level operations.
//! - Keep the CLI decoupled from storage details.

pub mod age;
pub mod contact_service;
