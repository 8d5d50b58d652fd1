//! Handlers for the `/dashboard` resource. Read-only aggregates, not cached.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use stringdesk_core::error::CoreError;
use stringdesk_core::string_job::{JobStatus, PRIORITY_HIGH};
use stringdesk_core::tension;
use stringdesk_core::tournament::remaining_days;
use stringdesk_core::types::DbId;
use stringdesk_db::models::dashboard::{BrandCount, RankedEntity, StatusCount};
use stringdesk_db::repositories::{DashboardRepo, TournamentRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::TournamentFilter;
use crate::state::AppState;

/// Length of each "top" ranking.
const TOP_N: i64 = 5;
/// Length of the string brand distribution.
const BRAND_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTournament {
    pub id: DbId,
    pub name: String,
    pub remaining_days: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub current_tournament: Option<CurrentTournament>,
    pub pending_jobs: i64,
    pub in_progress_jobs: i64,
    /// Completed within the clock's local calendar day.
    pub completed_jobs_today: i64,
    /// Open jobs at the highest priority.
    pub high_priority_jobs: i64,
    pub top_stringers: Vec<RankedEntity>,
    pub top_players: Vec<RankedEntity>,
    pub top_strings: Vec<RankedEntity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TensionBucket {
    pub range: &'static str,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub status_distribution: Vec<StatusCount>,
    /// Kilogram jobs only, every bucket present.
    pub tension_distribution: Vec<TensionBucket>,
    pub string_brand_distribution: Vec<BrandCount>,
}

/// GET /api/dashboard/stats
pub async fn stats(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    let pool = &state.pool;
    let today = state.clock.today();
    let (day_start, day_end) = state.clock.day_bounds(today);

    let current_tournament = TournamentRepo::find_active_on(pool, today)
        .await?
        .map(|t| CurrentTournament {
            remaining_days: remaining_days(t.end_date, today),
            id: t.id,
            name: t.name,
        });

    Ok(Json(DashboardStats {
        current_tournament,
        pending_jobs: DashboardRepo::count_with_status(pool, JobStatus::Pending).await?,
        in_progress_jobs: DashboardRepo::count_with_status(pool, JobStatus::InProgress).await?,
        completed_jobs_today: DashboardRepo::count_completed_between(pool, day_start, day_end)
            .await?,
        high_priority_jobs: DashboardRepo::count_open_with_priority(pool, PRIORITY_HIGH).await?,
        top_stringers: DashboardRepo::top_stringers(pool, TOP_N).await?,
        top_players: DashboardRepo::top_players(pool, TOP_N).await?,
        top_strings: DashboardRepo::top_strings(pool, TOP_N).await?,
    }))
}

/// GET /api/dashboard/distribution?tournamentId=
pub async fn distribution(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<TournamentFilter>,
) -> AppResult<Json<Distribution>> {
    let pool = &state.pool;
    let tournament_id = filter.tournament_id;

    if let Some(id) = tournament_id {
        if !TournamentRepo::exists(pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "Tournament",
                id,
            }
            .into());
        }
    }

    let tensions = DashboardRepo::kg_main_tensions(pool, tournament_id).await?;
    let tension_distribution = tension::distribution(tensions)
        .into_iter()
        .map(|(range, count)| TensionBucket { range, count })
        .collect();

    Ok(Json(Distribution {
        status_distribution: DashboardRepo::status_distribution(pool, tournament_id).await?,
        tension_distribution,
        string_brand_distribution: DashboardRepo::string_brand_distribution(
            pool,
            tournament_id,
            BRAND_LIMIT,
        )
        .await?,
    }))
}
