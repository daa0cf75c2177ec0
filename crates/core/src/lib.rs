//! Domain rules for the Khayroukum platform.
//!
//! Everything in this crate is pure: role and status vocabularies, the
//! authorization predicates used by the API handlers, upload limits, and
//! small aggregation helpers for the public statistics.

pub mod document;
pub mod error;
pub mod policy;
pub mod projet;
pub mod roles;
pub mod site;
pub mod stats;
pub mod types;
pub mod validation;
