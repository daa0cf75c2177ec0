//! Request extractors for the Bearer-token caller.
//!
//! Only the admin area is gated by role here; ownership and projet status
//! are checked in handlers through `khayroukum_core::policy`.

pub mod auth;
pub mod rbac;
