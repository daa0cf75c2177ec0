//! Administrateur management of the public site: content blocks, settings
//! and the media library.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khayroukum_core::document::{check_upload, mime_for_extension};
use khayroukum_core::site::{MAX_MEDIA_BYTES, MEDIA_EXTENSIONS};
use khayroukum_core::types::DbId;
use khayroukum_core::validation::{self, content_status, setting_group, slug};
use khayroukum_db::models::site::{
    CreateSiteContent, CreateSiteMedia, SiteContent, SiteMedia, SiteSetting, UpdateSiteContent,
    UpsertSiteSetting,
};
use khayroukum_db::repositories::{SiteContentRepo, SiteMediaRepo, SiteSettingRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::upload::UploadForm;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{DataResponse, PageMeta, PaginatedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Content blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SectionFilter {
    pub section: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(length(max = 100), custom(function = "slug"))]
    pub section: String,
    #[validate(length(max = 100), custom(function = "slug"))]
    pub key: String,
    pub value: serde_json::Value,
    #[validate(custom(function = "content_status"))]
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentRequest {
    pub value: Option<serde_json::Value>,
    #[validate(custom(function = "content_status"))]
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

/// GET /api/admin/content
pub async fn list_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<SectionFilter>,
) -> AppResult<Json<DataResponse<Vec<SiteContent>>>> {
    let data = SiteContentRepo::list(&state.pool, filter.section.as_deref()).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/content
///
/// A duplicate `(section, key)` pair is a 409.
pub async fn create_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateContentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SiteContent>>)> {
    let content = SiteContentRepo::create(
        &state.pool,
        &CreateSiteContent {
            section: input.section,
            key: input.key,
            value: input.value,
            status: input.status,
            sort_order: input.sort_order,
        },
    )
    .await?;

    state.cache.forget_content().await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: content })))
}

/// PUT /api/admin/content/{id}
pub async fn update_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateContentRequest>,
) -> AppResult<Json<DataResponse<SiteContent>>> {
    let content = SiteContentRepo::update(
        &state.pool,
        id,
        &UpdateSiteContent {
            value: input.value,
            status: input.status,
            sort_order: input.sort_order,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("SiteContent", id))?;

    state.cache.forget_content().await;
    Ok(Json(DataResponse { data: content }))
}

/// DELETE /api/admin/content/{id}
pub async fn delete_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    SiteContentRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("SiteContent", id))?;
    state.cache.forget_content().await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertSettingRequest {
    #[validate(custom(function = "setting_group"))]
    pub group: Option<String>,
    pub value: serde_json::Value,
    pub is_public: Option<bool>,
}

fn check_setting_key(key: &str) -> AppResult<()> {
    validation::slug(key).map_err(|e| {
        AppError::field(
            "key",
            e.message
                .map(|m| m.into_owned())
                .unwrap_or_else(|| "Invalid setting key".to_string()),
        )
    })
}

/// GET /api/admin/settings
pub async fn list_settings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<SiteSetting>>>> {
    let data = SiteSettingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/admin/settings/{key}
pub async fn upsert_setting(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(key): Path<String>,
    ValidatedJson(input): ValidatedJson<UpsertSettingRequest>,
) -> AppResult<Json<DataResponse<SiteSetting>>> {
    check_setting_key(&key)?;
    let setting = SiteSettingRepo::upsert(
        &state.pool,
        &key,
        &UpsertSiteSetting {
            group: input.group,
            value: input.value,
            is_public: input.is_public,
        },
    )
    .await?;

    tracing::info!(key = %key, admin_id = admin.user_id, "Site setting saved");
    state.cache.forget_settings().await;
    Ok(Json(DataResponse { data: setting }))
}

/// DELETE /api/admin/settings/{key}
pub async fn delete_setting(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    if !SiteSettingRepo::delete(&state.pool, &key).await? {
        // Keys are not ids; report through the generic missing-row mapping.
        return Err(sqlx::Error::RowNotFound.into());
    }
    state.cache.forget_settings().await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Media library
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MediaView {
    #[serde(flatten)]
    pub media: SiteMedia,
    pub url: String,
}

impl MediaView {
    fn new(state: &AppState, media: SiteMedia) -> Self {
        let url = state.storage.url(&media.file_path);
        Self { media, url }
    }
}

/// GET /api/admin/media
pub async fn list_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<MediaListParams>,
) -> AppResult<Json<PaginatedResponse<MediaView>>> {
    let (page, per_page, offset) = PageParams {
        page: params.page,
        per_page: params.per_page,
    }
    .resolve();
    let section = params.section.as_deref();

    let items = SiteMediaRepo::list_paginated(&state.pool, section, per_page, offset).await?;
    let total = SiteMediaRepo::count(&state.pool, section).await?;

    Ok(Json(PaginatedResponse {
        data: items
            .into_iter()
            .map(|m| MediaView::new(&state, m))
            .collect(),
        meta: PageMeta::new(page, per_page, total),
    }))
}

/// POST /api/admin/media
///
/// Multipart form with `file` and optional `title`, `section`, `alt_text`.
pub async fn upload_media(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MediaView>>)> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    let ext = check_upload(&file.file_name, file.bytes.len(), MEDIA_EXTENSIONS, MAX_MEDIA_BYTES)?;

    let file_path = state.storage.put("media", &ext, &file.bytes).await?;
    let created = SiteMediaRepo::create(
        &state.pool,
        &CreateSiteMedia {
            title: form.text("title").unwrap_or_else(|| file.file_name.clone()),
            file_path: file_path.clone(),
            mime_type: mime_for_extension(&ext).to_string(),
            size_bytes: file.bytes.len() as i64,
            section: form.text("section"),
            alt_text: form.text("alt_text"),
            uploaded_by: admin.user_id,
        },
    )
    .await;
    let media = match created {
        Ok(media) => media,
        Err(e) => {
            state.storage.delete_quietly(&file_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(media_id = media.id, admin_id = admin.user_id, "Media uploaded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MediaView::new(&state, media),
        }),
    ))
}

/// DELETE /api/admin/media/{id}
pub async fn delete_media(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let media = SiteMediaRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("SiteMedia", id))?;
    state.storage.delete_quietly(&media.file_path).await;
    Ok(StatusCode::NO_CONTENT)
}
