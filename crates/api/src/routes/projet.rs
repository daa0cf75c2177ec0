//! Route definitions for the `/projets` resource.
//!
//! Documents and funding offers are nested under a projet.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{document, offre, projet};
use crate::state::AppState;

/// Routes mounted at `/projets`.
///
/// ```text
/// GET    /                                     -> list_projets
/// POST   /                                     -> create_projet
/// GET    /{id}                                 -> get_projet
/// PUT    /{id}                                 -> update_projet
/// DELETE /{id}                                 -> delete_projet
/// PATCH  /{id}/valider                         -> validate_projet (admin)
/// PATCH  /{id}/statut                          -> update_statut (admin)
///
/// GET    /{projet_id}/documents                -> list_documents
/// POST   /{projet_id}/documents                -> upload_document (multipart)
/// GET    /{projet_id}/documents/{id}           -> get_document
/// DELETE /{projet_id}/documents/{id}           -> delete_document
/// GET    /{projet_id}/documents/{id}/download  -> download_document
/// PATCH  /{projet_id}/documents/{id}/review    -> review_document (admin)
///
/// GET    /{projet_id}/offres                   -> list_projet_offres
/// POST   /{projet_id}/offres                   -> create_offre
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projet::list_projets).post(projet::create_projet))
        .route(
            "/{id}",
            get(projet::get_projet)
                .put(projet::update_projet)
                .delete(projet::delete_projet),
        )
        .route("/{id}/valider", patch(projet::validate_projet))
        .route("/{id}/statut", patch(projet::update_statut))
        // Technical documents
        .route(
            "/{id}/documents",
            get(document::list_documents).post(document::upload_document),
        )
        .route(
            "/{id}/documents/{document_id}",
            get(document::get_document).delete(document::delete_document),
        )
        .route(
            "/{id}/documents/{document_id}/download",
            get(document::download_document),
        )
        .route(
            "/{id}/documents/{document_id}/review",
            patch(document::review_document),
        )
        // Funding offers
        .route(
            "/{id}/offres",
            get(offre::list_projet_offres).post(offre::create_offre),
        )
}
