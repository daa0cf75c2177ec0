//! Route definitions for the back-office (`/admin`).
//!
//! All endpoints require the `administrateur` role.

use axum::routing::{delete, get, patch, put};
use axum::Router;

use crate::handlers::{admin, site_admin};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                      -> list_users (?role, ?is_verified)
/// GET    /users/{id}                 -> get_user
/// PUT    /users/{id}                 -> update_user
/// DELETE /users/{id}                 -> delete_user
/// PATCH  /users/{id}/verifier        -> verify_user
///
/// GET    /stats                      -> stats
///
/// GET    /content                    -> list_content (?section)
/// POST   /content                    -> create_content
/// PUT    /content/{id}               -> update_content
/// DELETE /content/{id}               -> delete_content
///
/// GET    /settings                   -> list_settings
/// PUT    /settings/{key}             -> upsert_setting
/// DELETE /settings/{key}             -> delete_setting
///
/// GET    /media                      -> list_media (?page, ?per_page, ?section)
/// POST   /media                      -> upload_media (multipart)
/// DELETE /media/{id}                 -> delete_media
///
/// GET    /contact-messages           -> list_contact_messages (?statut)
/// PATCH  /contact-messages/{id}/lu   -> mark_contact_read
/// DELETE /contact-messages/{id}      -> delete_contact_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/users/{id}/verifier", patch(admin::verify_user))
        .route("/stats", get(admin::stats))
        // Site content
        .route(
            "/content",
            get(site_admin::list_content).post(site_admin::create_content),
        )
        .route(
            "/content/{id}",
            put(site_admin::update_content).delete(site_admin::delete_content),
        )
        .route("/settings", get(site_admin::list_settings))
        .route(
            "/settings/{key}",
            put(site_admin::upsert_setting).delete(site_admin::delete_setting),
        )
        .route(
            "/media",
            get(site_admin::list_media).post(site_admin::upload_media),
        )
        .route("/media/{id}", delete(site_admin::delete_media))
        // Contact form inbox
        .route("/contact-messages", get(admin::list_contact_messages))
        .route("/contact-messages/{id}/lu", patch(admin::mark_contact_read))
        .route(
            "/contact-messages/{id}",
            delete(admin::delete_contact_message),
        )
}
