//! Handlers for funding offers (`offres_financement`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use khayroukum_core::policy;
use khayroukum_core::roles::Role;
use khayroukum_core::types::DbId;
use khayroukum_db::models::offre::{CreateOffre, OffreFinancement};
use khayroukum_db::repositories::{OffreRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::projet::{find_projet, find_visible_projet, statut_of};
use crate::middleware::auth::AuthUser;
use crate::notifications::Notice;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOffreRequest {
    #[validate(range(
        exclusive_min = 0.0,
        max = 999999999999.99,
        message = "montant must be greater than zero and at most 999999999999.99"
    ))]
    pub montant: f64,
    /// Name shown on the public donor board. Empty means anonymous.
    #[validate(length(max = 255))]
    pub nom_sur_tableau: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// GET /api/projets/{projet_id}/offres
///
/// Administrateurs and the projet creator see every offer; a donor sees
/// only their own offers on the projet.
pub async fn list_projet_offres(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(projet_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OffreFinancement>>>> {
    let projet = find_visible_projet(&state, &auth, projet_id).await?;
    let offres = OffreRepo::list_by_projet(&state.pool, projet_id).await?;

    let data = if policy::can_view_offres(&auth.actor(), projet.created_by) {
        offres
    } else if auth.role == Role::Donateur {
        offres
            .into_iter()
            .filter(|o| o.donateur_id == auth.user_id)
            .collect()
    } else {
        return Err(AppError::forbidden("You cannot view offers on this projet"));
    };

    Ok(Json(DataResponse { data }))
}

/// POST /api/projets/{projet_id}/offres
///
/// Verified donors pledge funding to a validated projet. The creator and
/// administrateurs are notified.
pub async fn create_offre(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(projet_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateOffreRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<OffreFinancement>>)> {
    let projet = find_projet(&state, projet_id).await?;

    // Verification is read fresh; the token only carries the role.
    let is_verified = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.is_verified)
        .unwrap_or(false);
    policy::check_funding(&auth.actor(), is_verified, statut_of(&projet)?)
        .map_err(|denial| AppError::forbidden(denial.message()))?;

    let offre = OffreRepo::create(
        &state.pool,
        &CreateOffre {
            projet_id,
            donateur_id: auth.user_id,
            montant: input.montant,
            nom_sur_tableau: input
                .nom_sur_tableau
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            message: input.message,
        },
    )
    .await?;

    tracing::info!(
        offre_id = offre.id,
        projet_id,
        donateur_id = auth.user_id,
        montant = offre.montant,
        "Funding offer created"
    );
    let notice = Notice::offre_recue(&offre, &projet.titre);
    let notifier = state.notifier();
    notifier.notify(projet.created_by, &notice).await;
    notifier.notify_admins(&notice, Some(projet.created_by)).await;
    state.cache.forget_catalog().await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: offre })))
}

/// GET /api/offres
///
/// Administrateurs see all offers, donors their own, prestataires the
/// offers received by their projets.
pub async fn list_offres(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<OffreFinancement>>>> {
    let (donateur_id, projet_creator) = match auth.role {
        Role::Administrateur => (None, None),
        Role::Donateur => (Some(auth.user_id), None),
        Role::Prestataire => (None, Some(auth.user_id)),
    };
    let data = OffreRepo::list(&state.pool, donateur_id, projet_creator).await?;
    Ok(Json(DataResponse { data }))
}
