//! Route definitions for the `/offres` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::offre;
use crate::state::AppState;

/// Routes mounted at `/offres`.
///
/// ```text
/// GET /  -> list_offres (scoped by role)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(offre::list_offres))
}
