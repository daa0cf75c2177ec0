//! Helpers for the public and admin statistics.

use std::collections::BTreeMap;

use crate::projet::ProjetStatut;

/// Fold `(statut, count)` rows into a map holding every canonical status.
///
/// Statuses missing from the rows are reported as zero, and legacy
/// spellings (`terminé`) are merged into their canonical entry. Unknown
/// values are dropped.
pub fn status_breakdown(rows: &[(String, i64)]) -> BTreeMap<&'static str, i64> {
    let mut counts: BTreeMap<&'static str, i64> =
        ProjetStatut::ALL.iter().map(|s| (s.as_str(), 0)).collect();

    for (statut, count) in rows {
        if let Some(parsed) = ProjetStatut::parse(statut) {
            *counts.entry(parsed.as_str()).or_insert(0) += count;
        }
    }
    counts
}

/// Share of the budget already pledged, as a percentage in `0..=100`.
///
/// A projet without a budget reports 0.
pub fn funding_progress(collected: f64, budget: f64) -> f64 {
    if budget <= 0.0 || collected <= 0.0 {
        return 0.0;
    }
    let pct = collected / budget * 100.0;
    (pct.min(100.0) * 100.0).round() / 100.0
}

/// Amount still needed to reach the budget, never negative.
pub fn remaining_amount(collected: f64, budget: f64) -> f64 {
    (budget - collected).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_zero_fills_missing_statuses() {
        let counts = status_breakdown(&[("valide".to_string(), 3)]);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts["valide"], 3);
        assert_eq!(counts["en_attente"], 0);
        assert_eq!(counts["termine"], 0);
    }

    #[test]
    fn breakdown_merges_legacy_spelling() {
        let counts = status_breakdown(&[
            ("termine".to_string(), 2),
            ("terminé".to_string(), 1),
            ("inconnu".to_string(), 9),
        ]);
        assert_eq!(counts["termine"], 3);
        assert_eq!(counts.values().sum::<i64>(), 3);
    }

    #[test]
    fn progress_is_capped_and_rounded() {
        assert_eq!(funding_progress(500.0, 1000.0), 50.0);
        assert_eq!(funding_progress(2000.0, 1000.0), 100.0);
        assert_eq!(funding_progress(1.0, 3.0), 33.33);
    }

    #[test]
    fn progress_without_budget_is_zero() {
        assert_eq!(funding_progress(100.0, 0.0), 0.0);
        assert_eq!(funding_progress(0.0, 100.0), 0.0);
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(remaining_amount(300.0, 1000.0), 700.0);
        assert_eq!(remaining_amount(1300.0, 1000.0), 0.0);
    }
}
