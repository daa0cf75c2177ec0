//! Unauthenticated endpoints backing the public website.
//!
//! Every read is served through [`ResponseCache`](crate::cache::ResponseCache);
//! the mutating handlers elsewhere drop the affected keys.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khayroukum_core::site::{HOMEPAGE_SECTIONS, SECTION_ABOUT};
use khayroukum_core::types::DbId;
use khayroukum_core::validation;
use khayroukum_db::models::contact::CreateContactMessage;
use khayroukum_db::models::offre::DonorBoardEntry;
use khayroukum_db::models::projet::ProjetFilter;
use khayroukum_db::models::site::SiteContent;
use khayroukum_db::models::stats::{PlatformTotals, RegionStats};
use khayroukum_db::repositories::{
    ContactMessageRepo, OffreRepo, ProjetRepo, SiteContentRepo, SiteSettingRepo, StatsRepo,
    VillageRepo,
};
use khayroukum_db::DbPool;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::cache::{content_key, KEY_ABOUT, KEY_HOMEPAGE, KEY_PROJECTS, KEY_SETTINGS, KEY_STATS, KEY_VILLAGES};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::projet::ProjetView;
use crate::notifications::Notice;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Projets shown on the homepage.
const HOMEPAGE_PROJECTS: i64 = 6;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Platform figures shared by the public and admin dashboards.
#[derive(Debug, Serialize)]
pub struct PlatformStats {
    #[serde(flatten)]
    pub totals: PlatformTotals,
    pub projets_par_statut: BTreeMap<&'static str, i64>,
    pub regions: Vec<RegionStats>,
}

pub(crate) async fn platform_stats(pool: &DbPool) -> AppResult<PlatformStats> {
    let totals = StatsRepo::totals(pool).await?;
    let rows = StatsRepo::projet_status_counts(pool).await?;
    let regions = StatsRepo::by_region(pool).await?;
    Ok(PlatformStats {
        totals,
        projets_par_statut: khayroukum_core::stats::status_breakdown(&rows),
        regions,
    })
}

#[derive(Debug, Serialize)]
pub struct PublicProjet {
    #[serde(flatten)]
    pub projet: ProjetView,
    pub donateurs: Vec<DonorBoardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PublicProjectQuery {
    pub statut: Option<String>,
    pub region: Option<String>,
    pub village_id: Option<DbId>,
    pub limit: Option<i64>,
}

impl PublicProjectQuery {
    /// Parse the query into a repository filter. The cache key is derived
    /// from the filter, so equivalent queries share one entry.
    fn filter(&self) -> AppResult<ProjetFilter> {
        let statut = self
            .statut
            .as_deref()
            .map(khayroukum_core::projet::parse_statut)
            .transpose()?;
        Ok(ProjetFilter {
            statut: statut.map(|s| s.as_str().to_string()),
            village_id: self.village_id,
            region: normalized_region(self.region.as_deref()),
            public_only: true,
            limit: self.limit.map(|l| l.clamp(1, 100)),
            ..Default::default()
        })
    }
}

fn projects_cache_key(filter: &ProjetFilter) -> String {
    format!(
        "{KEY_PROJECTS}?statut={}&region={}&village_id={}&limit={}",
        filter.statut.as_deref().unwrap_or(""),
        filter.region.as_deref().unwrap_or(""),
        filter.village_id.map(|v| v.to_string()).unwrap_or_default(),
        filter.limit.map(|v| v.to_string()).unwrap_or_default(),
    )
}

/// Trimmed region, or `None` when blank.
fn normalized_region(region: Option<&str>) -> Option<String> {
    region
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
pub struct PublicVillageQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 255))]
    pub nom: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub sujet: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Published blocks of one section as `{ key: value }`.
fn section_map(blocks: &[SiteContent]) -> BTreeMap<String, Value> {
    blocks
        .iter()
        .map(|b| (b.key.clone(), b.value.clone()))
        .collect()
}

/// Published blocks grouped as `{ section: { key: value } }`.
fn group_by_section(blocks: Vec<SiteContent>) -> BTreeMap<String, BTreeMap<String, Value>> {
    let mut sections: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
    for block in blocks {
        sections
            .entry(block.section)
            .or_default()
            .insert(block.key, block.value);
    }
    sections
}

async fn public_settings(pool: &DbPool) -> AppResult<BTreeMap<String, Value>> {
    let settings = SiteSettingRepo::list_public(pool).await?;
    Ok(settings.into_iter().map(|s| (s.key, s.value)).collect())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/public/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<Value>>> {
    let data = state
        .cache
        .remember(KEY_STATS, || platform_stats(&state.pool))
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/projects
///
/// Projets past `en_attente`, with funding progress.
pub async fn projects(
    State(state): State<AppState>,
    Query(params): Query<PublicProjectQuery>,
) -> AppResult<Json<DataResponse<Value>>> {
    let filter = params.filter()?;

    let data = state
        .cache
        .remember(&projects_cache_key(&filter), || async {
            let projets = ProjetRepo::list_with_funding(&state.pool, &filter).await?;
            Ok::<_, AppError>(projets.into_iter().map(ProjetView::from).collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/projects/{id}
///
/// Pending projets are reported as missing.
pub async fn project(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Value>>> {
    let key = format!("{KEY_PROJECTS}.{id}");
    let data = state
        .cache
        .remember(&key, || async {
            let projet = ProjetRepo::find_with_funding(&state.pool, id)
                .await?
                .filter(|p| {
                    khayroukum_core::projet::ProjetStatut::parse(&p.projet.statut)
                        .is_some_and(|s| s.is_public())
                })
                .ok_or_else(|| AppError::not_found("Projet", id))?;
            let donateurs = OffreRepo::donor_board(&state.pool, id).await?;
            Ok::<_, AppError>(PublicProjet {
                projet: projet.into(),
                donateurs,
            })
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/villages
pub async fn villages(
    State(state): State<AppState>,
    Query(params): Query<PublicVillageQuery>,
) -> AppResult<Json<DataResponse<Value>>> {
    let region = normalized_region(params.region.as_deref());
    let key = match region.as_deref() {
        Some(region) => format!("{KEY_VILLAGES}?region={region}"),
        None => KEY_VILLAGES.to_string(),
    };
    let data = state
        .cache
        .remember(&key, || async {
            Ok::<_, AppError>(
                VillageRepo::list_public_summaries(&state.pool, region.as_deref()).await?,
            )
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/about
pub async fn about(State(state): State<AppState>) -> AppResult<Json<DataResponse<Value>>> {
    let data = state
        .cache
        .remember(KEY_ABOUT, || async {
            let blocks = SiteContentRepo::list_published(&state.pool, &[SECTION_ABOUT]).await?;
            let stats = platform_stats(&state.pool).await?;
            Ok::<_, AppError>(serde_json::json!({
                "content": section_map(&blocks),
                "stats": stats,
            }))
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/content/{section}
pub async fn content(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<Json<DataResponse<Value>>> {
    if validation::slug(&section).is_err() {
        return Err(AppError::field("section", "Invalid section name"));
    }
    let data = state
        .cache
        .remember(&content_key(&section), || async {
            let blocks = SiteContentRepo::list_published(&state.pool, &[section.as_str()]).await?;
            Ok::<_, AppError>(section_map(&blocks))
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/settings
pub async fn settings(State(state): State<AppState>) -> AppResult<Json<DataResponse<Value>>> {
    let data = state
        .cache
        .remember(KEY_SETTINGS, || public_settings(&state.pool))
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/homepage
///
/// Everything the landing page renders in one payload.
pub async fn homepage(State(state): State<AppState>) -> AppResult<Json<DataResponse<Value>>> {
    let data = state
        .cache
        .remember(KEY_HOMEPAGE, || async {
            let blocks = SiteContentRepo::list_published(&state.pool, HOMEPAGE_SECTIONS).await?;
            let settings = public_settings(&state.pool).await?;
            let stats = platform_stats(&state.pool).await?;
            let projets = ProjetRepo::list_with_funding(
                &state.pool,
                &ProjetFilter {
                    public_only: true,
                    limit: Some(HOMEPAGE_PROJECTS),
                    ..Default::default()
                },
            )
            .await?;
            Ok::<_, AppError>(serde_json::json!({
                "sections": group_by_section(blocks),
                "settings": settings,
                "stats": stats,
                "projets": projets.into_iter().map(ProjetView::from).collect::<Vec<_>>(),
            }))
        })
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/public/contact
pub async fn contact(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ContactRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let message = ContactMessageRepo::create(
        &state.pool,
        &CreateContactMessage {
            nom: input.nom.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            sujet: input.sujet,
            message: input.message,
        },
    )
    .await?;

    tracing::info!(contact_id = message.id, "Contact message received");
    state
        .notifier()
        .notify_admins(&Notice::contact_recu(&message), None)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Votre message a bien été envoyé",
        }),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn block(section: &str, key: &str, value: Value) -> SiteContent {
        SiteContent {
            id: 1,
            section: section.into(),
            key: key.into(),
            value,
            status: "published".into(),
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn blocks_group_by_section_then_key() {
        let grouped = group_by_section(vec![
            block("hero", "title", json!("Khayroukum")),
            block("hero", "subtitle", json!("Ensemble pour nos villages")),
            block("footer", "copyright", json!("2025")),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["hero"]["title"], json!("Khayroukum"));
        assert_eq!(grouped["footer"]["copyright"], json!("2025"));
    }

    #[test]
    fn project_cache_key_uses_parsed_filter() {
        let q = PublicProjectQuery {
            statut: Some(" terminé ".into()),
            region: Some("  Kayes ".into()),
            village_id: None,
            limit: Some(5000),
        };
        let key = projects_cache_key(&q.filter().unwrap());
        assert!(key.starts_with(KEY_PROJECTS));
        assert!(key.contains("statut=termine&"));
        assert!(key.contains("region=Kayes&"));
        assert!(key.ends_with("limit=100"));
    }

    #[test]
    fn equivalent_project_queries_share_a_key() {
        let a = PublicProjectQuery {
            statut: Some("termine".into()),
            region: Some("Kayes".into()),
            village_id: None,
            limit: Some(100),
        };
        let b = PublicProjectQuery {
            statut: Some("terminé".into()),
            region: Some(" Kayes".into()),
            village_id: None,
            limit: Some(900),
        };
        assert_eq!(
            projects_cache_key(&a.filter().unwrap()),
            projects_cache_key(&b.filter().unwrap())
        );
    }

    #[test]
    fn unknown_statut_is_rejected_before_caching() {
        let q = PublicProjectQuery {
            statut: Some("brouillon".into()),
            region: None,
            village_id: None,
            limit: None,
        };
        assert!(q.filter().is_err());
    }

    #[test]
    fn blank_region_is_no_filter() {
        assert_eq!(normalized_region(Some("   ")), None);
        assert_eq!(normalized_region(Some(" Ségou ")).as_deref(), Some("Ségou"));
        assert_eq!(normalized_region(None), None);
    }
}
