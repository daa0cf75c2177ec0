//! Aggregate queries behind the public and admin statistics.

use khayroukum_core::roles::{ROLE_DONATEUR, ROLE_PRESTATAIRE};
use sqlx::PgPool;

use crate::models::stats::{PlatformTotals, RegionStats};

pub struct StatsRepo;

impl StatsRepo {
    /// Platform-wide totals. `population_beneficiaire` sums the population
    /// of villages that have at least one non-pending projet.
    pub async fn totals(pool: &PgPool) -> Result<PlatformTotals, sqlx::Error> {
        let query = format!(
            "SELECT
                (SELECT COUNT(*) FROM villages) AS total_villages,
                (SELECT COUNT(*) FROM projets) AS total_projets,
                (SELECT COUNT(*) FROM users WHERE role = '{ROLE_PRESTATAIRE}') AS total_prestataires,
                (SELECT COUNT(*) FROM users WHERE role = '{ROLE_DONATEUR}') AS total_donateurs,
                (SELECT COUNT(*) FROM offres_financement) AS total_offres,
                (SELECT COALESCE(SUM(montant), 0)::float8 FROM offres_financement) AS montant_total,
                (SELECT COALESCE(SUM(v.population), 0)::bigint FROM villages v
                  WHERE EXISTS (
                    SELECT 1 FROM projets p
                    WHERE p.village_id = v.id AND p.statut <> 'en_attente'
                  )) AS population_beneficiaire"
        );
        sqlx::query_as::<_, PlatformTotals>(&query)
            .fetch_one(pool)
            .await
    }

    /// Raw `(statut, count)` pairs from the projets table.
    pub async fn projet_status_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as("SELECT statut, COUNT(*) FROM projets GROUP BY statut")
            .fetch_all(pool)
            .await
    }

    /// Villages, projets and funding per region, largest funding first.
    pub async fn by_region(pool: &PgPool) -> Result<Vec<RegionStats>, sqlx::Error> {
        sqlx::query_as::<_, RegionStats>(
            "SELECT v.region,
                    COUNT(DISTINCT v.id) AS villages,
                    COUNT(DISTINCT p.id) AS projets,
                    COALESCE(SUM(o.montant), 0)::float8 AS montant
             FROM villages v
             LEFT JOIN projets p ON p.village_id = v.id
             LEFT JOIN offres_financement o ON o.projet_id = p.id
             GROUP BY v.region
             ORDER BY montant DESC, v.region ASC",
        )
        .fetch_all(pool)
        .await
    }
}
