//! Khayroukum API server library.
//!
//! Exposes config, state, error handling, routes and the shared services so
//! integration tests and the binary entrypoint both reach them.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
