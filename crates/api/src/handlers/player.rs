//! Handlers for the `/players` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::{optional_text, require_text};
use stringdesk_db::models::player::{CreatePlayer, Player, UpdatePlayer};
use stringdesk_db::repositories::PlayerRepo;
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::state::AppState;

async fn ensure_player_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Player> {
    PlayerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Player",
            id,
        }))
}

fn normalize(input: CreatePlayer) -> Result<CreatePlayer, CoreError> {
    Ok(CreatePlayer {
        name: require_text("Name", &input.name)?,
        last_name: require_text("Last name", &input.last_name)?,
        country_code: optional_text(input.country_code.as_deref()),
    })
}

/// GET /api/players
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Player>>> {
    let players = PlayerRepo::list(&state.pool).await?;
    Ok(Json(players))
}

/// GET /api/players/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Player>> {
    Ok(Json(ensure_player_exists(&state.pool, id).await?))
}

/// POST /api/players
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreatePlayer>,
) -> AppResult<(StatusCode, Json<Player>)> {
    let input = normalize(input)?;
    let player = PlayerRepo::create(&state.pool, &input).await?;
    tracing::info!(player_id = player.id, user_id = user.user_id, "Player created");
    Ok((StatusCode::CREATED, Json(player)))
}

/// PUT /api/players/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlayer>,
) -> AppResult<Json<Player>> {
    let input = normalize(input)?;
    let current = ensure_player_exists(&state.pool, id).await?;

    let outcome = PlayerRepo::update(&state.pool, id, current.version, &input).await?;
    let player = versioned::resolve(&state.pool, PlayerRepo::TABLE, id, outcome)
        .await?
        .into_core("Player", id)?;

    tracing::info!(player_id = id, user_id = user.user_id, "Player updated");
    Ok(Json(player))
}

/// DELETE /api/players/{id}
///
/// Blocked while the player owns racquets or has jobs.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_player_exists(&state.pool, id).await?;

    let racquets = PlayerRepo::count_racquets(&state.pool, id).await?;
    let jobs = PlayerRepo::count_jobs(&state.pool, id).await?;
    if racquets > 0 || jobs > 0 {
        tracing::warn!(player_id = id, racquets, jobs, "Player delete blocked");
        return Err(CoreError::Guard(format!(
            "Cannot delete player: {racquets} racquet(s) and {jobs} job(s) reference it"
        ))
        .into());
    }

    if !PlayerRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Player", id }.into());
    }
    tracing::info!(player_id = id, user_id = user.user_id, "Player deleted");
    Ok(StatusCode::NO_CONTENT)
}
