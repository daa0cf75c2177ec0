//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts, filled by the API layer after validation
//! - An update DTO (all `Option` fields) for `COALESCE` patches

pub mod contact;
pub mod document;
pub mod notification;
pub mod offre;
pub mod projet;
pub mod session;
pub mod site;
pub mod stats;
pub mod user;
pub mod village;
