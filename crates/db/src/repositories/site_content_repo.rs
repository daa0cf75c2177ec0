//! Repository for the `site_contents` table.

use khayroukum_core::site::CONTENT_PUBLISHED;
use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::site::{CreateSiteContent, SiteContent, UpdateSiteContent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, section, key, value, status, sort_order, created_at, updated_at";

/// Provides CRUD operations for editable site content blocks.
pub struct SiteContentRepo;

impl SiteContentRepo {
    /// Insert a content block. A duplicate `(section, key)` violates
    /// `uq_site_contents_section_key`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSiteContent,
    ) -> Result<SiteContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_contents (section, key, value, status, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, 'draft'), COALESCE($5, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteContent>(&query)
            .bind(&input.section)
            .bind(&input.key)
            .bind(&input.value)
            .bind(&input.status)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// All blocks, optionally restricted to one section, in display order.
    pub async fn list(
        pool: &PgPool,
        section: Option<&str>,
    ) -> Result<Vec<SiteContent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_contents
             WHERE ($1::text IS NULL OR section = $1)
             ORDER BY section ASC, sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, SiteContent>(&query)
            .bind(section)
            .fetch_all(pool)
            .await
    }

    /// Published blocks of the given sections, in display order.
    pub async fn list_published(
        pool: &PgPool,
        sections: &[&str],
    ) -> Result<Vec<SiteContent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_contents
             WHERE status = '{CONTENT_PUBLISHED}' AND section = ANY($1)
             ORDER BY section ASC, sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, SiteContent>(&query)
            .bind(sections)
            .fetch_all(pool)
            .await
    }

    /// Update a block. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSiteContent,
    ) -> Result<Option<SiteContent>, sqlx::Error> {
        let query = format!(
            "UPDATE site_contents SET
                value = COALESCE($2, value),
                status = COALESCE($3, status),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteContent>(&query)
            .bind(id)
            .bind(&input.value)
            .bind(&input.status)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a block, returning it so the caller knows which section changed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<SiteContent>, sqlx::Error> {
        let query = format!("DELETE FROM site_contents WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, SiteContent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
