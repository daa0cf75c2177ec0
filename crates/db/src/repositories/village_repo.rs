//! Repository for the `villages` table.

use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::village::{CreateVillage, UpdateVillage, Village, VillageSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nom, region, commune, population, latitude, longitude, \
                       description, statut, created_by, created_at, updated_at";

/// Summary columns with the number of projets attached to each village.
const SUMMARY_SELECT: &str = "SELECT v.id, v.nom, v.region, v.commune, v.population, \
                              v.latitude, v.longitude, v.statut, COUNT(p.id) AS projets_count \
                              FROM villages v LEFT JOIN projets p ON p.village_id = v.id";

/// Provides CRUD operations for villages.
pub struct VillageRepo;

impl VillageRepo {
    /// Insert a new village, returning the created row.
    ///
    /// A missing `statut` falls back to the column default (`actif`).
    pub async fn create(pool: &PgPool, input: &CreateVillage) -> Result<Village, sqlx::Error> {
        let query = format!(
            "INSERT INTO villages
                (nom, region, commune, population, latitude, longitude, description, statut, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'actif'), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Village>(&query)
            .bind(&input.nom)
            .bind(&input.region)
            .bind(&input.commune)
            .bind(input.population)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.description)
            .bind(&input.statut)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a village by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Village>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM villages WHERE id = $1");
        sqlx::query_as::<_, Village>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List villages ordered by name, optionally restricted to one creator.
    pub async fn list(
        pool: &PgPool,
        created_by: Option<DbId>,
    ) -> Result<Vec<Village>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM villages
             WHERE ($1::bigint IS NULL OR created_by = $1)
             ORDER BY nom ASC"
        );
        sqlx::query_as::<_, Village>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Active villages with their projet counts, for the public site.
    pub async fn list_public_summaries(
        pool: &PgPool,
        region: Option<&str>,
    ) -> Result<Vec<VillageSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE v.statut = 'actif'
               AND ($1::text IS NULL OR v.region = $1)
             GROUP BY v.id
             ORDER BY v.nom ASC"
        );
        sqlx::query_as::<_, VillageSummary>(&query)
            .bind(region)
            .fetch_all(pool)
            .await
    }

    /// Update a village. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVillage,
    ) -> Result<Option<Village>, sqlx::Error> {
        let query = format!(
            "UPDATE villages SET
                nom = COALESCE($2, nom),
                region = COALESCE($3, region),
                commune = COALESCE($4, commune),
                population = COALESCE($5, population),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                description = COALESCE($8, description),
                statut = COALESCE($9, statut)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Village>(&query)
            .bind(id)
            .bind(&input.nom)
            .bind(&input.region)
            .bind(&input.commune)
            .bind(input.population)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.description)
            .bind(&input.statut)
            .fetch_optional(pool)
            .await
    }

    /// Delete a village. Its projets, documents and offers cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM villages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
