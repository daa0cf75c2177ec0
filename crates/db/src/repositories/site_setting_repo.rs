//! Repository for the `site_settings` table.

use sqlx::PgPool;

use crate::models::site::{SiteSetting, UpsertSiteSetting};

/// `group` is a reserved word and must stay quoted.
const COLUMNS: &str = "id, \"group\", key, value, is_public, created_at, updated_at";

/// Key/value settings for the public site.
pub struct SiteSettingRepo;

impl SiteSettingRepo {
    /// Every setting, grouped then keyed.
    pub async fn list(pool: &PgPool) -> Result<Vec<SiteSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_settings ORDER BY \"group\", key");
        sqlx::query_as::<_, SiteSetting>(&query).fetch_all(pool).await
    }

    /// Settings flagged `is_public`, exposed without authentication.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<SiteSetting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_settings WHERE is_public = TRUE ORDER BY \"group\", key"
        );
        sqlx::query_as::<_, SiteSetting>(&query).fetch_all(pool).await
    }

    /// Insert or replace the setting stored under `key`.
    ///
    /// On update, a `None` group or visibility keeps the stored value.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        input: &UpsertSiteSetting,
    ) -> Result<SiteSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (\"group\", key, value, is_public)
             VALUES (COALESCE($2, 'general'), $1, $3, COALESCE($4, TRUE))
             ON CONFLICT ON CONSTRAINT uq_site_settings_key DO UPDATE SET
                \"group\" = COALESCE($2, site_settings.\"group\"),
                value = EXCLUDED.value,
                is_public = COALESCE($4, site_settings.is_public)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(key)
            .bind(&input.group)
            .bind(&input.value)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM site_settings WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
