//! Administrateur back-office: users, dashboard and contact messages.
//!
//! Every handler takes [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khayroukum_core::error::CoreError;
use khayroukum_core::roles::ROLE_DONATEUR;
use khayroukum_core::site::{self, CONTACT_NOUVEAU, CONTACT_STATUSES};
use khayroukum_core::types::DbId;
use khayroukum_core::validation::user_role;
use khayroukum_db::models::contact::ContactMessage;
use khayroukum_db::models::user::{UpdateUser, UserResponse};
use khayroukum_db::repositories::{ContactMessageRepo, DocumentRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::public::{platform_stats, PlatformStats};
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::Notice;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub is_verified: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "user_role"))]
    pub role: Option<String>,
    pub is_verified: Option<bool>,
    #[validate(length(max = 50))]
    pub telephone: Option<String>,
    #[validate(length(max = 255))]
    pub organisation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub statut: Option<String>,
}

/// Dashboard payload: public figures plus the back-office queues.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    #[serde(flatten)]
    pub platform: PlatformStats,
    pub projets_en_attente: i64,
    pub donateurs_non_verifies: i64,
    pub messages_non_lus: i64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool, params.role.as_deref(), params.is_verified).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<AdminUpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name: input.name.map(|n| n.trim().to_string()),
            email: input.email.map(|e| e.trim().to_lowercase()),
            role: input.role,
            is_verified: input.is_verified,
            telephone: input.telephone,
            organisation: input.organisation,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated by administrateur");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/admin/users/{id}
///
/// An administrateur cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot delete your own account".into(),
        )));
    }
    let files = DocumentRepo::file_paths_for_user(&state.pool, id).await?;
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }
    // Cascades remove the user's villages, projets, documents and offers.
    for file in &files {
        state.storage.delete_quietly(file).await;
    }

    state.cache.forget_catalog().await;
    tracing::info!(user_id = id, admin_id = admin.user_id, files = files.len(), "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/users/{id}/verifier
pub async fn verify_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::set_verified(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User verified");
    state
        .notifier()
        .notify(user.id, &Notice::compte_verifie())
        .await;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/admin/stats
///
/// Not cached; administrateurs expect live queues.
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AdminStats>>> {
    let platform = platform_stats(&state.pool).await?;
    let projets_en_attente = platform
        .projets_par_statut
        .get(khayroukum_core::projet::STATUT_EN_ATTENTE)
        .copied()
        .unwrap_or(0);
    let donateurs_non_verifies =
        UserRepo::count(&state.pool, Some(ROLE_DONATEUR), Some(false)).await?;
    let messages_non_lus = ContactMessageRepo::count(&state.pool, Some(CONTACT_NOUVEAU)).await?;

    Ok(Json(DataResponse {
        data: AdminStats {
            platform,
            projets_en_attente,
            donateurs_non_verifies,
            messages_non_lus,
        },
    }))
}

// ---------------------------------------------------------------------------
// Contact messages
// ---------------------------------------------------------------------------

/// GET /api/admin/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ContactListParams>,
) -> AppResult<Json<DataResponse<Vec<ContactMessage>>>> {
    if let Some(statut) = params.statut.as_deref() {
        site::validate_one_of("statut", statut, CONTACT_STATUSES).map_err(CoreError::Validation)?;
    }
    let data = ContactMessageRepo::list(&state.pool, params.statut.as_deref()).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/admin/contact-messages/{id}/lu
pub async fn mark_contact_read(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let data = ContactMessageRepo::mark_read(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ContactMessage", id))?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/admin/contact-messages/{id}
pub async fn delete_contact_message(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContactMessageRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("ContactMessage", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
