//! Repository for the `offres_financement` table.

use khayroukum_core::types::DbId;
use sqlx::PgPool;

use crate::models::offre::{CreateOffre, DonorBoardEntry, OffreFinancement};

/// Offer columns joined with the donor's display name. Queries alias the
/// offer table as `o` and users as `u`.
const COLUMNS: &str = "o.id, o.projet_id, o.donateur_id, u.name AS donateur_nom, \
                       o.montant::float8 AS montant, o.nom_sur_tableau, o.message, \
                       o.created_at, o.updated_at";

/// Provides operations for funding offers.
pub struct OffreRepo;

impl OffreRepo {
    /// Insert a new offer, returning it with the donor's name.
    pub async fn create(pool: &PgPool, input: &CreateOffre) -> Result<OffreFinancement, sqlx::Error> {
        let query = format!(
            "WITH o AS (
                INSERT INTO offres_financement (projet_id, donateur_id, montant, nom_sur_tableau, message)
                VALUES ($1, $2, $3::numeric, $4, $5)
                RETURNING *
             )
             SELECT {COLUMNS} FROM o JOIN users u ON u.id = o.donateur_id"
        );
        sqlx::query_as::<_, OffreFinancement>(&query)
            .bind(input.projet_id)
            .bind(input.donateur_id)
            .bind(input.montant)
            .bind(&input.nom_sur_tableau)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Offers on one projet, newest first.
    pub async fn list_by_projet(
        pool: &PgPool,
        projet_id: DbId,
    ) -> Result<Vec<OffreFinancement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offres_financement o
             JOIN users u ON u.id = o.donateur_id
             WHERE o.projet_id = $1
             ORDER BY o.created_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, OffreFinancement>(&query)
            .bind(projet_id)
            .fetch_all(pool)
            .await
    }

    /// Offers visible to a user: a donor's own, a prestataire's received,
    /// or everything when both filters are `None`.
    pub async fn list(
        pool: &PgPool,
        donateur_id: Option<DbId>,
        projet_creator: Option<DbId>,
    ) -> Result<Vec<OffreFinancement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offres_financement o
             JOIN users u ON u.id = o.donateur_id
             JOIN projets p ON p.id = o.projet_id
             WHERE ($1::bigint IS NULL OR o.donateur_id = $1)
               AND ($2::bigint IS NULL OR p.created_by = $2)
             ORDER BY o.created_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, OffreFinancement>(&query)
            .bind(donateur_id)
            .bind(projet_creator)
            .fetch_all(pool)
            .await
    }

    /// Public donor board of a projet. Donors who left `nom_sur_tableau`
    /// empty appear anonymously.
    pub async fn donor_board(
        pool: &PgPool,
        projet_id: DbId,
    ) -> Result<Vec<DonorBoardEntry>, sqlx::Error> {
        sqlx::query_as::<_, DonorBoardEntry>(
            "SELECT NULLIF(TRIM(nom_sur_tableau), '') AS nom,
                    montant::float8 AS montant,
                    message,
                    created_at
             FROM offres_financement
             WHERE projet_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(projet_id)
        .fetch_all(pool)
        .await
    }
}
