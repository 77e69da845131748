//! Multi-criteria contact search.
//!
//! # Responsibility
//! - Filter repository contents by optional per-field criteria.
//! - Keep match semantics inside core.

pub mod criteria;
