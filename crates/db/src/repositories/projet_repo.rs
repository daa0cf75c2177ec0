//! Repository for the `projets` table.
//!
//! Money is stored as `NUMERIC(14,2)` and read back as `float8`.

use khayroukum_core::projet::STATUT_EN_ATTENTE;
use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::projet::{CreateProjet, Projet, ProjetFilter, ProjetWithFunding, UpdateProjet};

/// Column list shared across queries to avoid repetition. Every query
/// aliases `projets` as `p`.
const COLUMNS: &str = "p.id, p.titre, p.description, p.type_projet, p.budget::float8 AS budget, \
                       p.date_debut, p.date_fin, p.statut, p.village_id, p.created_by, \
                       p.validated_by, p.validated_at, p.created_at, p.updated_at";

/// Projet columns plus village name and collected funding.
const FUNDING_SELECT: &str = "v.nom AS village_nom, v.region AS village_region, \
                              COALESCE(SUM(o.montant), 0)::float8 AS montant_collecte, \
                              COUNT(o.id) AS offres_count \
                              FROM projets p \
                              JOIN villages v ON v.id = p.village_id \
                              LEFT JOIN offres_financement o ON o.projet_id = p.id";

/// Provides CRUD and lifecycle operations for projets.
pub struct ProjetRepo;

impl ProjetRepo {
    /// Insert a new projet in `en_attente`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProjet) -> Result<Projet, sqlx::Error> {
        let query = format!(
            "INSERT INTO projets AS p
                (titre, description, type_projet, budget, date_debut, date_fin, village_id, created_by)
             VALUES ($1, $2, $3, $4::numeric, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Projet>(&query)
            .bind(&input.titre)
            .bind(&input.description)
            .bind(&input.type_projet)
            .bind(input.budget)
            .bind(input.date_debut)
            .bind(input.date_fin)
            .bind(input.village_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a projet by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Projet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projets p WHERE p.id = $1");
        sqlx::query_as::<_, Projet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a projet with its village and funding totals.
    pub async fn find_with_funding(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjetWithFunding>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {FUNDING_SELECT}
             WHERE p.id = $1
             GROUP BY p.id, v.id"
        );
        sqlx::query_as::<_, ProjetWithFunding>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projets with funding totals, newest first.
    ///
    /// Every filter field is optional; `public_only` hides `en_attente`.
    pub async fn list_with_funding(
        pool: &PgPool,
        filter: &ProjetFilter,
    ) -> Result<Vec<ProjetWithFunding>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {FUNDING_SELECT}
             WHERE ($1::text IS NULL OR p.statut = $1)
               AND ($2::bigint IS NULL OR p.created_by = $2)
               AND ($3::bigint IS NULL OR p.village_id = $3)
               AND ($4::text IS NULL OR v.region = $4)
               AND ($5 = FALSE OR p.statut <> '{STATUT_EN_ATTENTE}')
             GROUP BY p.id, v.id
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $6"
        );
        sqlx::query_as::<_, ProjetWithFunding>(&query)
            .bind(&filter.statut)
            .bind(filter.created_by)
            .bind(filter.village_id)
            .bind(&filter.region)
            .bind(filter.public_only)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Update a projet's editable fields. The status is never touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjet,
    ) -> Result<Option<Projet>, sqlx::Error> {
        let query = format!(
            "UPDATE projets AS p SET
                titre = COALESCE($2, p.titre),
                description = COALESCE($3, p.description),
                type_projet = COALESCE($4, p.type_projet),
                budget = COALESCE($5::numeric, p.budget),
                date_debut = COALESCE($6, p.date_debut),
                date_fin = COALESCE($7, p.date_fin),
                village_id = COALESCE($8, p.village_id)
             WHERE p.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Projet>(&query)
            .bind(id)
            .bind(&input.titre)
            .bind(&input.description)
            .bind(&input.type_projet)
            .bind(input.budget)
            .bind(input.date_debut)
            .bind(input.date_fin)
            .bind(input.village_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a pending projet to `valide`, recording the administrator.
    ///
    /// The update only applies while the row is still `en_attente`, so two
    /// concurrent validations cannot both succeed. Returns `None` when the
    /// projet is missing or no longer pending.
    pub async fn validate(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<Option<Projet>, sqlx::Error> {
        let query = format!(
            "UPDATE projets AS p SET
                statut = 'valide',
                validated_by = $2,
                validated_at = NOW()
             WHERE p.id = $1 AND p.statut = '{STATUT_EN_ATTENTE}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Projet>(&query)
            .bind(id)
            .bind(admin_id)
            .fetch_optional(pool)
            .await
    }

    /// Change the status from `from` to `to`. Returns `None` if the row is
    /// missing or its status changed concurrently.
    pub async fn set_statut(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Projet>, sqlx::Error> {
        let query = format!(
            "UPDATE projets AS p SET statut = $3
             WHERE p.id = $1 AND p.statut = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Projet>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Delete a projet. Documents and offers cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
