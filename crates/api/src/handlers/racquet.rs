//! Handlers for the `/racquets` resource.
//!
//! Racquets are returned with their owner attached.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::{optional_text, require_text};
use stringdesk_db::models::player::Player;
use stringdesk_db::models::racquet::{CreateRacquet, Racquet, RacquetWithPlayer, UpdateRacquet};
use stringdesk_db::repositories::{PlayerRepo, RacquetRepo};
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::query::RacquetQuery;
use crate::state::AppState;

async fn ensure_racquet_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Racquet> {
    RacquetRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Racquet",
            id,
        }))
}

fn validate_head_size(head_size: Option<f64>) -> Result<(), CoreError> {
    match head_size {
        Some(size) if !size.is_finite() || size <= 0.0 => Err(CoreError::Validation(
            "Head size must be a positive number".into(),
        )),
        _ => Ok(()),
    }
}

/// Validate the body and resolve its owner. A missing owner is a validation
/// failure, not a 404, because the path did not name it.
async fn normalize_new(
    pool: &sqlx::PgPool,
    input: CreateRacquet,
) -> AppResult<(CreateRacquet, Player)> {
    let brand = require_text("Brand", &input.brand)?;
    let model = require_text("Model", &input.model)?;
    validate_head_size(input.head_size)?;

    let player = PlayerRepo::find_by_id(pool, input.player_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Player {} does not exist", input.player_id))
        })?;

    Ok((
        CreateRacquet {
            player_id: input.player_id,
            brand,
            model,
            serial_number: optional_text(input.serial_number.as_deref()),
            head_size: input.head_size,
            notes: optional_text(input.notes.as_deref()),
        },
        player,
    ))
}

fn normalize_changes(input: UpdateRacquet) -> Result<UpdateRacquet, CoreError> {
    validate_head_size(input.head_size)?;
    Ok(UpdateRacquet {
        brand: require_text("Brand", &input.brand)?,
        model: require_text("Model", &input.model)?,
        serial_number: optional_text(input.serial_number.as_deref()),
        head_size: input.head_size,
        notes: optional_text(input.notes.as_deref()),
    })
}

/// GET /api/racquets?playerId=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<RacquetQuery>,
) -> AppResult<Json<Vec<RacquetWithPlayer>>> {
    if let Some(player_id) = params.player_id {
        if !PlayerRepo::exists(&state.pool, player_id).await? {
            return Err(CoreError::NotFound {
                entity: "Player",
                id: player_id,
            }
            .into());
        }
    }
    Ok(Json(RacquetRepo::list(&state.pool, params.player_id).await?))
}

/// GET /api/racquets/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RacquetWithPlayer>> {
    let racquet = ensure_racquet_exists(&state.pool, id).await?;
    let player = PlayerRepo::find_by_id(&state.pool, racquet.player_id).await?;
    Ok(Json(RacquetWithPlayer { racquet, player }))
}

/// POST /api/racquets
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateRacquet>,
) -> AppResult<(StatusCode, Json<RacquetWithPlayer>)> {
    let (input, player) = normalize_new(&state.pool, input).await?;
    let racquet = RacquetRepo::create(&state.pool, &input).await?;
    tracing::info!(
        racquet_id = racquet.id,
        player_id = racquet.player_id,
        user_id = user.user_id,
        "Racquet created"
    );
    Ok((
        StatusCode::CREATED,
        Json(RacquetWithPlayer {
            racquet,
            player: Some(player),
        }),
    ))
}

/// PUT /api/racquets/{id}
///
/// The owner is not editable; a `playerId` in the body is ignored.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRacquet>,
) -> AppResult<Json<RacquetWithPlayer>> {
    let input = normalize_changes(input)?;
    let current = ensure_racquet_exists(&state.pool, id).await?;
    let player = PlayerRepo::find_by_id(&state.pool, current.player_id).await?;

    let outcome = RacquetRepo::update(&state.pool, id, current.version, &input).await?;
    let racquet = versioned::resolve(&state.pool, RacquetRepo::TABLE, id, outcome)
        .await?
        .into_core("Racquet", id)?;

    tracing::info!(racquet_id = id, user_id = user.user_id, "Racquet updated");
    Ok(Json(RacquetWithPlayer { racquet, player }))
}

/// DELETE /api/racquets/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_racquet_exists(&state.pool, id).await?;

    let jobs = RacquetRepo::count_jobs(&state.pool, id).await?;
    if jobs > 0 {
        tracing::warn!(racquet_id = id, jobs, "Racquet delete blocked");
        return Err(CoreError::Guard(format!(
            "Cannot delete racquet: {jobs} job(s) reference it"
        ))
        .into());
    }

    if !RacquetRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Racquet", id }.into());
    }
    tracing::info!(racquet_id = id, user_id = user.user_id, "Racquet deleted");
    Ok(StatusCode::NO_CONTENT)
}
