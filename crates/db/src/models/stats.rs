//! Aggregate rows used by the statistics endpoints.

use serde::Serialize;
use sqlx::FromRow;

/// Platform-wide totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformTotals {
    pub total_villages: i64,
    pub total_projets: i64,
    pub total_prestataires: i64,
    pub total_donateurs: i64,
    pub total_offres: i64,
    pub montant_total: f64,
    /// Population of villages with at least one validated projet.
    pub population_beneficiaire: i64,
}

/// Projet count and funding per region.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegionStats {
    pub region: String,
    pub villages: i64,
    pub projets: i64,
    pub montant: f64,
}
