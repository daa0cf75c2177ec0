//! Handlers for the `/projets` resource and its lifecycle actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use khayroukum_core::error::CoreError;
use khayroukum_core::projet::{self, ProjetStatut};
use khayroukum_core::roles::Role;
use khayroukum_core::stats::{funding_progress, remaining_amount};
use khayroukum_core::types::DbId;
use khayroukum_core::validation::{not_blank, projet_statut};
use khayroukum_core::policy;
use khayroukum_db::models::projet::{
    CreateProjet, Projet, ProjetFilter, ProjetWithFunding, UpdateProjet,
};
use khayroukum_db::repositories::{DocumentRepo, ProjetRepo, VillageRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::Notice;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProjetListParams {
    pub statut: Option<String>,
    pub village_id: Option<DbId>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjetRequest {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub titre: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(length(max = 100))]
    pub type_projet: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 999999999999.99,
        message = "budget must be between 0 and 999999999999.99"
    ))]
    pub budget: f64,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub village_id: DbId,
}

/// Editable fields. The status is only changed through `valider` and
/// `statut`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjetRequest {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub titre: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub type_projet: Option<String>,
    #[validate(range(
        min = 0.0,
        max = 999999999999.99,
        message = "budget must be between 0 and 999999999999.99"
    ))]
    pub budget: Option<f64>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub village_id: Option<DbId>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatutRequest {
    #[validate(custom(function = "projet_statut"))]
    pub statut: String,
}

/// A projet with its village, collected funding and progress.
#[derive(Debug, Serialize)]
pub struct ProjetView {
    #[serde(flatten)]
    pub projet: ProjetWithFunding,
    /// Percentage of the budget covered by offers, capped at 100.
    pub progression: f64,
    pub montant_restant: f64,
}

impl From<ProjetWithFunding> for ProjetView {
    fn from(projet: ProjetWithFunding) -> Self {
        let progression = funding_progress(projet.montant_collecte, projet.projet.budget);
        let montant_restant = remaining_amount(projet.montant_collecte, projet.projet.budget);
        Self {
            projet,
            progression,
            montant_restant,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_projet(state: &AppState, id: DbId) -> AppResult<Projet> {
    ProjetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Projet", id))
}

/// Status of a stored projet. The column is constrained, so a parse failure
/// means the row was written outside the application.
pub(crate) fn statut_of(projet: &Projet) -> AppResult<ProjetStatut> {
    ProjetStatut::parse(&projet.statut).ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "Projet {} has unknown statut '{}'",
            projet.id, projet.statut
        )))
    })
}

/// Find a projet the caller is allowed to see. Hidden projets are reported
/// as forbidden, not missing.
pub(crate) async fn find_visible_projet(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Projet> {
    let projet = find_projet(state, id).await?;
    if !policy::can_view_projet(&auth.actor(), projet.created_by, statut_of(&projet)?) {
        return Err(AppError::forbidden("This projet is not available"));
    }
    Ok(projet)
}

async fn ensure_village_exists(state: &AppState, village_id: DbId) -> AppResult<()> {
    if VillageRepo::find_by_id(&state.pool, village_id).await?.is_none() {
        return Err(AppError::field("village_id", "The selected village does not exist"));
    }
    Ok(())
}

async fn projet_view(state: &AppState, id: DbId) -> AppResult<ProjetView> {
    let projet = ProjetRepo::find_with_funding(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Projet", id))?;
    Ok(projet.into())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/projets
///
/// Administrateurs see everything, prestataires their own projets, donors
/// every projet past `en_attente`.
pub async fn list_projets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ProjetListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjetView>>>> {
    let statut = params
        .statut
        .as_deref()
        .map(projet::parse_statut)
        .transpose()?
        .map(|s| s.as_str().to_string());

    let mut filter = ProjetFilter {
        statut,
        village_id: params.village_id,
        region: params.region,
        ..Default::default()
    };
    match auth.role {
        Role::Administrateur => {}
        Role::Prestataire => filter.created_by = Some(auth.user_id),
        Role::Donateur => filter.public_only = true,
    }

    let projets = ProjetRepo::list_with_funding(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: projets.into_iter().map(ProjetView::from).collect(),
    }))
}

/// POST /api/projets
///
/// New projets start `en_attente`; administrateurs are notified.
pub async fn create_projet(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProjetRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjetView>>)> {
    if !policy::can_create_projet(&auth.actor()) {
        return Err(AppError::forbidden(
            "Only prestataires and administrateurs can create projets",
        ));
    }
    projet::validate_dates(input.date_debut, input.date_fin)?;
    ensure_village_exists(&state, input.village_id).await?;

    let projet = ProjetRepo::create(
        &state.pool,
        &CreateProjet {
            titre: input.titre.trim().to_string(),
            description: input.description,
            type_projet: input.type_projet,
            budget: input.budget,
            date_debut: input.date_debut,
            date_fin: input.date_fin,
            village_id: input.village_id,
            created_by: auth.user_id,
        },
    )
    .await?;

    tracing::info!(projet_id = projet.id, user_id = auth.user_id, "Projet submitted");
    state
        .notifier()
        .notify_admins(&Notice::projet_soumis(&projet), Some(auth.user_id))
        .await;
    state.cache.forget_catalog().await;

    let view = projet_view(&state, projet.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/projets/{id}
pub async fn get_projet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjetView>>> {
    find_visible_projet(&state, &auth, id).await?;
    Ok(Json(DataResponse {
        data: projet_view(&state, id).await?,
    }))
}

/// PUT /api/projets/{id}
pub async fn update_projet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProjetRequest>,
) -> AppResult<Json<DataResponse<ProjetView>>> {
    let existing = find_projet(&state, id).await?;
    if !policy::can_update_projet(&auth.actor(), existing.created_by, statut_of(&existing)?) {
        return Err(AppError::forbidden(
            "This projet can no longer be modified by its creator",
        ));
    }

    projet::validate_dates(
        input.date_debut.or(existing.date_debut),
        input.date_fin.or(existing.date_fin),
    )?;
    if let Some(village_id) = input.village_id {
        ensure_village_exists(&state, village_id).await?;
    }

    ProjetRepo::update(
        &state.pool,
        id,
        &UpdateProjet {
            titre: input.titre.map(|t| t.trim().to_string()),
            description: input.description,
            type_projet: input.type_projet,
            budget: input.budget,
            date_debut: input.date_debut,
            date_fin: input.date_fin,
            village_id: input.village_id,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("Projet", id))?;

    state.cache.forget_catalog().await;
    Ok(Json(DataResponse {
        data: projet_view(&state, id).await?,
    }))
}

/// DELETE /api/projets/{id}
pub async fn delete_projet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_projet(&state, id).await?;
    if !policy::can_delete_projet(&auth.actor(), existing.created_by, statut_of(&existing)?) {
        return Err(AppError::forbidden("You cannot delete this projet"));
    }

    let files = DocumentRepo::file_paths_for_projet(&state.pool, id).await?;
    if !ProjetRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Projet", id));
    }
    for file in &files {
        state.storage.delete_quietly(file).await;
    }

    state.cache.forget_catalog().await;
    tracing::info!(projet_id = id, user_id = auth.user_id, "Projet deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// PATCH /api/projets/{id}/valider
///
/// Move an `en_attente` projet to `valide`, record the validating
/// administrateur and notify the creator.
pub async fn validate_projet(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjetView>>> {
    let existing = find_projet(&state, id).await?;
    projet::validate_validation(statut_of(&existing)?)?;

    // The conditional update loses if another administrateur got there first.
    let validated = ProjetRepo::validate(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Projet is already validated".into())))?;

    tracing::info!(projet_id = id, admin_id = admin.user_id, "Projet validated");
    state
        .notifier()
        .notify(validated.created_by, &Notice::projet_valide(&validated))
        .await;
    state.cache.forget_catalog().await;

    Ok(Json(DataResponse {
        data: projet_view(&state, id).await?,
    }))
}

/// PATCH /api/projets/{id}/statut
///
/// Administrateur-driven progress: `valide` to `en_cours` to `termine`.
pub async fn update_statut(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateStatutRequest>,
) -> AppResult<Json<DataResponse<ProjetView>>> {
    let existing = find_projet(&state, id).await?;
    let from = statut_of(&existing)?;
    let to = projet::parse_statut(&input.statut)?;
    projet::validate_admin_transition(from, to)?;

    let updated = ProjetRepo::set_statut(&state.pool, id, from.as_str(), to.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Projet statut changed concurrently, reload and retry".into(),
            ))
        })?;

    tracing::info!(projet_id = id, admin_id = admin.user_id, %from, %to, "Projet statut changed");
    state
        .notifier()
        .notify(updated.created_by, &Notice::projet_statut(&updated))
        .await;
    state.cache.forget_catalog().await;

    Ok(Json(DataResponse {
        data: projet_view(&state, id).await?,
    }))
}
