//! Route definitions for the `/villages` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::village;
use crate::state::AppState;

/// Routes mounted at `/villages`.
///
/// ```text
/// GET    /       -> list_villages (?mine)
/// POST   /       -> create_village
/// GET    /{id}   -> get_village
/// PUT    /{id}   -> update_village
/// DELETE /{id}   -> delete_village
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(village::list_villages).post(village::create_village))
        .route(
            "/{id}",
            get(village::get_village)
                .put(village::update_village)
                .delete(village::delete_village),
        )
}
