//! Public-site CMS models: content blocks, settings and media.

use khayroukum_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `site_contents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteContent {
    pub id: DbId,
    pub section: String,
    pub key: String,
    pub value: serde_json::Value,
    pub status: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSiteContent {
    pub section: String,
    pub key: String,
    pub value: serde_json::Value,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSiteContent {
    pub value: Option<serde_json::Value>,
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

/// A row from the `site_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSetting {
    pub id: DbId,
    pub group: String,
    pub key: String,
    pub value: serde_json::Value,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct UpsertSiteSetting {
    pub group: Option<String>,
    pub value: serde_json::Value,
    pub is_public: Option<bool>,
}

/// A row from the `site_media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteMedia {
    pub id: DbId,
    pub title: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub section: Option<String>,
    pub alt_text: Option<String>,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSiteMedia {
    pub title: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub section: Option<String>,
    pub alt_text: Option<String>,
    pub uploaded_by: DbId,
}
