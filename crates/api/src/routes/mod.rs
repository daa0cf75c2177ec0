pub mod admin;
pub mod auth;
pub mod health;
pub mod notification;
pub mod offre;
pub mod projet;
pub mod public;
pub mod village;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register, /login, /refresh                      public auth
/// /logout, /user                                   authenticated session
///
/// /villages                                        list, create
/// /villages/{id}                                   get, update, delete
///
/// /projets                                         list, create
/// /projets/{id}                                    get, update, delete
/// /projets/{id}/valider                            validate (admin)
/// /projets/{id}/statut                             lifecycle change (admin)
/// /projets/{projet_id}/documents                   list, upload (multipart)
/// /projets/{projet_id}/documents/{id}              get, delete
/// /projets/{projet_id}/documents/{id}/download     file download
/// /projets/{projet_id}/documents/{id}/review       review (admin)
/// /projets/{projet_id}/offres                      list, create
///
/// /offres                                          offers visible to the caller
///
/// /notifications                                   list
/// /notifications/unread-count                      unread count
/// /notifications/marquer-tout-lu                   mark all read
/// /notifications/{id}                              delete
/// /notifications/{id}/marquer-lu                   mark read
///
/// /public/...                                      cached public site data, contact form
/// /admin/...                                       back-office (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Registration, login and session routes.
        .merge(auth::router())
        .nest("/villages", village::router())
        // Projet routes (also nests documents and offers).
        .nest("/projets", projet::router())
        .nest("/offres", offre::router())
        .nest("/notifications", notification::router())
        // Public website, no authentication.
        .nest("/public", public::router())
        .nest("/admin", admin::router())
}
