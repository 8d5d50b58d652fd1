//! Handlers for the `/tournaments` resource. Writes are Admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stringdesk_core::error::CoreError;
use stringdesk_core::tournament::validate_date_range;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::{optional_text, require_text};
use stringdesk_db::models::tournament::{CreateTournament, Tournament, UpdateTournament};
use stringdesk_db::repositories::TournamentRepo;
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

async fn ensure_tournament_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Tournament> {
    TournamentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tournament",
            id,
        }))
}

fn normalize(input: CreateTournament) -> Result<CreateTournament, CoreError> {
    validate_date_range(input.start_date, input.end_date)?;
    Ok(CreateTournament {
        name: require_text("Name", &input.name)?,
        start_date: input.start_date,
        end_date: input.end_date,
        location: optional_text(input.location.as_deref()),
        category: optional_text(input.category.as_deref()),
    })
}

/// GET /api/tournaments
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Tournament>>> {
    Ok(Json(TournamentRepo::list(&state.pool).await?))
}

/// GET /api/tournaments/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Tournament>> {
    Ok(Json(ensure_tournament_exists(&state.pool, id).await?))
}

/// GET /api/tournaments/current
///
/// The tournament running on the clock's calendar day, or 204 when none is.
/// Overlapping tournaments resolve to the earliest start date.
pub async fn current(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let today = state.clock.today();
    match TournamentRepo::find_active_on(&state.pool, today).await? {
        Some(tournament) => Ok(Json(tournament).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/tournaments
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTournament>,
) -> AppResult<(StatusCode, Json<Tournament>)> {
    let input = normalize(input)?;
    let tournament = TournamentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        tournament_id = tournament.id,
        user_id = user.user_id,
        "Tournament created"
    );
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// PUT /api/tournaments/{id}
pub async fn update(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTournament>,
) -> AppResult<Json<Tournament>> {
    let input = normalize(input)?;
    let current = ensure_tournament_exists(&state.pool, id).await?;

    let outcome = TournamentRepo::update(&state.pool, id, current.version, &input).await?;
    let tournament = versioned::resolve(&state.pool, TournamentRepo::TABLE, id, outcome)
        .await?
        .into_core("Tournament", id)?;

    tracing::info!(tournament_id = id, user_id = user.user_id, "Tournament updated");
    Ok(Json(tournament))
}

/// DELETE /api/tournaments/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_tournament_exists(&state.pool, id).await?;

    let jobs = TournamentRepo::count_jobs(&state.pool, id).await?;
    if jobs > 0 {
        tracing::warn!(tournament_id = id, jobs, "Tournament delete blocked");
        return Err(CoreError::Guard(format!(
            "Cannot delete tournament: {jobs} job(s) belong to it"
        ))
        .into());
    }

    if !TournamentRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Tournament", id }.into());
    }
    tracing::info!(tournament_id = id, user_id = user.user_id, "Tournament deleted");
    Ok(StatusCode::NO_CONTENT)
}
