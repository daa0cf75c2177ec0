//! Route definitions for the public website (`/public`).
//!
//! No authentication; reads are cached.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET  /stats              -> stats
/// GET  /projects           -> projects (?statut, ?region, ?village_id, ?limit)
/// GET  /projects/{id}      -> project (with donor board)
/// GET  /villages           -> villages (?region)
/// GET  /about              -> about
/// GET  /content/{section}  -> content
/// GET  /settings           -> settings
/// GET  /homepage           -> homepage
/// POST /contact            -> contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(public::stats))
        .route("/projects", get(public::projects))
        .route("/projects/{id}", get(public::project))
        .route("/villages", get(public::villages))
        .route("/about", get(public::about))
        .route("/content/{section}", get(public::content))
        .route("/settings", get(public::settings))
        .route("/homepage", get(public::homepage))
        .route("/contact", post(public::contact))
}
