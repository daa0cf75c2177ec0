//! Repository for the `site_media` table.

use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::site::{CreateSiteMedia, SiteMedia};

const COLUMNS: &str = "id, title, file_path, mime_type, size_bytes, section, alt_text, \
                       uploaded_by, created_at, updated_at";

/// Media library backing the public site.
pub struct SiteMediaRepo;

impl SiteMediaRepo {
    pub async fn create(pool: &PgPool, input: &CreateSiteMedia) -> Result<SiteMedia, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_media (title, file_path, mime_type, size_bytes, section, alt_text, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteMedia>(&query)
            .bind(&input.title)
            .bind(&input.file_path)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.section)
            .bind(&input.alt_text)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// One page of media, newest first.
    pub async fn list_paginated(
        pool: &PgPool,
        section: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SiteMedia>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_media
             WHERE ($1::text IS NULL OR section = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SiteMedia>(&query)
            .bind(section)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, section: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM site_media WHERE ($1::text IS NULL OR section = $1)")
            .bind(section)
            .fetch_one(pool)
            .await
    }

    /// Delete a media row, returning it so the caller can remove the file.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<SiteMedia>, sqlx::Error> {
        let query = format!("DELETE FROM site_media WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, SiteMedia>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
