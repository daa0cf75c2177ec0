//! Handlers for the `/villages` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khayroukum_core::policy;
use khayroukum_core::types::DbId;
use khayroukum_core::validation::{not_blank, village_statut};
use khayroukum_db::models::village::{CreateVillage, UpdateVillage, Village};
use khayroukum_db::repositories::{DocumentRepo, VillageRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VillageListParams {
    /// Only villages created by the caller.
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVillageRequest {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub nom: String,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub region: String,
    #[validate(length(max = 255))]
    pub commune: Option<String>,
    #[validate(range(min = 0))]
    pub population: Option<i32>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub description: Option<String>,
    #[validate(custom(function = "village_statut"))]
    pub statut: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVillageRequest {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub nom: Option<String>,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub region: Option<String>,
    #[validate(length(max = 255))]
    pub commune: Option<String>,
    #[validate(range(min = 0))]
    pub population: Option<i32>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub description: Option<String>,
    #[validate(custom(function = "village_statut"))]
    pub statut: Option<String>,
}

async fn find_village(state: &AppState, id: DbId) -> AppResult<Village> {
    VillageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Village", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/villages
pub async fn list_villages(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<VillageListParams>,
) -> AppResult<Json<DataResponse<Vec<Village>>>> {
    let created_by = params.mine.then_some(auth.user_id);
    let villages = VillageRepo::list(&state.pool, created_by).await?;
    Ok(Json(DataResponse { data: villages }))
}

/// POST /api/villages
pub async fn create_village(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateVillageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Village>>)> {
    if !policy::can_create_village(&auth.actor()) {
        return Err(AppError::forbidden(
            "Only prestataires and administrateurs can create villages",
        ));
    }

    let village = VillageRepo::create(
        &state.pool,
        &CreateVillage {
            nom: input.nom.trim().to_string(),
            region: input.region.trim().to_string(),
            commune: input.commune,
            population: input.population.unwrap_or(0),
            latitude: input.latitude,
            longitude: input.longitude,
            description: input.description,
            statut: input.statut,
            created_by: auth.user_id,
        },
    )
    .await?;

    state.cache.forget_catalog().await;
    tracing::info!(village_id = village.id, user_id = auth.user_id, "Village created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: village })))
}

/// GET /api/villages/{id}
pub async fn get_village(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Village>>> {
    let village = find_village(&state, id).await?;
    Ok(Json(DataResponse { data: village }))
}

/// PUT /api/villages/{id}
pub async fn update_village(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateVillageRequest>,
) -> AppResult<Json<DataResponse<Village>>> {
    let village = find_village(&state, id).await?;
    if !policy::can_manage_village(&auth.actor(), village.created_by) {
        return Err(AppError::forbidden("You cannot modify this village"));
    }

    let updated = VillageRepo::update(
        &state.pool,
        id,
        &UpdateVillage {
            nom: input.nom.map(|s| s.trim().to_string()),
            region: input.region.map(|s| s.trim().to_string()),
            commune: input.commune,
            population: input.population,
            latitude: input.latitude,
            longitude: input.longitude,
            description: input.description,
            statut: input.statut,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("Village", id))?;

    state.cache.forget_catalog().await;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/villages/{id}
///
/// Projets, documents and offers cascade; stored document files are removed.
pub async fn delete_village(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let village = find_village(&state, id).await?;
    if !policy::can_manage_village(&auth.actor(), village.created_by) {
        return Err(AppError::forbidden("You cannot delete this village"));
    }

    let files = DocumentRepo::file_paths_for_village(&state.pool, id).await?;
    if !VillageRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Village", id));
    }
    for file in &files {
        state.storage.delete_quietly(file).await;
    }

    state.cache.forget_catalog().await;
    tracing::info!(village_id = id, user_id = auth.user_id, files = files.len(), "Village deleted");
    Ok(StatusCode::NO_CONTENT)
}
