//! Handlers for the `/string-jobs` resource.
//!
//! Every write reads the job, checks the transition guard from
//! `stringdesk_core::string_job`, then issues one version-checked statement.
//! A statement that matches no row is resolved by [`versioned::resolve`]
//! into NotFound (row gone) or Conflict (row changed underneath us).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use stringdesk_core::datetime::deserialize_optional_timestamp;
use stringdesk_core::error::CoreError;
use stringdesk_core::string_job::{
    cancellation_notes, check_cancel, check_complete, check_delete, check_mark_paid, check_start,
    check_update, check_update_status, completion_notes, validate_priority, validate_tensions,
    JobStatus,
};
use stringdesk_core::types::{DbId, Timestamp};
use stringdesk_core::validation::optional_text;
use stringdesk_db::models::string_job::{
    default_price, CreateStringJob, NewStringJob, StringJob, StringJobDetails, StringJobFilter,
    UpdateStringJob,
};
use stringdesk_db::repositories::string_job_repo::StringJobChanges;
use stringdesk_db::repositories::{
    PlayerRepo, RacquetRepo, StringJobRepo, StringTypeRepo, StringerRepo, TournamentRepo,
};
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::query::StringJobQuery;
use crate::state::AppState;

const ENTITY: &str = "StringJob";

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body for `PATCH /string-jobs/{id}/complete`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteJobRequest {
    /// When the work was finished. Defaults to now; may be backdated.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
}

/// Body for `PATCH /string-jobs/{id}/cancel`.
#[derive(Debug, Default, Deserialize)]
pub struct CancelJobRequest {
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_job_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<StringJob> {
    StringJobRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
}

async fn load_details(pool: &sqlx::PgPool, id: DbId) -> AppResult<StringJobDetails> {
    StringJobRepo::find_details(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
}

/// Resolve the outcome of a version-checked job write.
async fn settle(
    pool: &sqlx::PgPool,
    id: DbId,
    outcome: Option<StringJob>,
) -> AppResult<StringJob> {
    versioned::resolve(pool, StringJobRepo::TABLE, id, outcome)
        .await?
        .into_core(ENTITY, id)
        .map_err(AppError::from)
}

fn validate_price(price: Option<Decimal>) -> Result<(), CoreError> {
    match price {
        Some(p) if p < Decimal::ZERO => {
            Err(CoreError::Validation("Price must not be negative".into()))
        }
        _ => Ok(()),
    }
}

/// String, stringer and tournament references must point at existing rows.
async fn validate_references(
    pool: &sqlx::PgPool,
    main_string_id: Option<DbId>,
    cross_string_id: Option<DbId>,
    stringer_id: Option<DbId>,
    tournament_id: Option<DbId>,
) -> AppResult<()> {
    for (label, id) in [("Main string", main_string_id), ("Cross string", cross_string_id)] {
        if let Some(id) = id {
            if !StringTypeRepo::exists(pool, id).await? {
                return Err(
                    CoreError::Validation(format!("{label} {id} does not exist")).into(),
                );
            }
        }
    }
    if let Some(id) = stringer_id {
        if !StringerRepo::exists(pool, id).await? {
            return Err(CoreError::Validation(format!("Stringer {id} does not exist")).into());
        }
    }
    if let Some(id) = tournament_id {
        if !TournamentRepo::exists(pool, id).await? {
            return Err(CoreError::Validation(format!("Tournament {id} does not exist")).into());
        }
    }
    Ok(())
}

async fn list_filtered(
    pool: &sqlx::PgPool,
    filter: &StringJobFilter,
) -> AppResult<Json<Vec<StringJobDetails>>> {
    Ok(Json(StringJobRepo::list(pool, filter).await?))
}

async fn ensure_player(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    if PlayerRepo::exists(pool, id).await? {
        Ok(())
    } else {
        Err(CoreError::NotFound { entity: "Player", id }.into())
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/string-jobs?status=&tournamentId=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<StringJobQuery>,
) -> AppResult<Json<Vec<StringJobDetails>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()?;

    if let Some(tournament_id) = params.tournament_id {
        if !TournamentRepo::exists(&state.pool, tournament_id).await? {
            return Err(CoreError::NotFound {
                entity: "Tournament",
                id: tournament_id,
            }
            .into());
        }
    }

    let filter = StringJobFilter {
        status,
        tournament_id: params.tournament_id,
        ..Default::default()
    };
    list_filtered(&state.pool, &filter).await
}

/// GET /api/string-jobs/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StringJobDetails>> {
    Ok(Json(load_details(&state.pool, id).await?))
}

/// GET /api/string-jobs/player/{id}
///
/// 404 when the player is unknown; `[]` when they simply have no jobs.
pub async fn list_by_player(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
) -> AppResult<Json<Vec<StringJobDetails>>> {
    ensure_player(&state.pool, player_id).await?;
    let filter = StringJobFilter {
        player_id: Some(player_id),
        ..Default::default()
    };
    list_filtered(&state.pool, &filter).await
}

/// GET /api/string-jobs/player/{id}/unpaid
///
/// Completed jobs of the player that have not been paid yet.
pub async fn list_unpaid_by_player(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(player_id): Path<DbId>,
) -> AppResult<Json<Vec<StringJobDetails>>> {
    ensure_player(&state.pool, player_id).await?;
    let filter = StringJobFilter {
        player_id: Some(player_id),
        unpaid_only: true,
        ..Default::default()
    };
    list_filtered(&state.pool, &filter).await
}

/// GET /api/string-jobs/stringer/{id}
pub async fn list_by_stringer(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(stringer_id): Path<DbId>,
) -> AppResult<Json<Vec<StringJobDetails>>> {
    if !StringerRepo::exists(&state.pool, stringer_id).await? {
        return Err(CoreError::NotFound {
            entity: "Stringer",
            id: stringer_id,
        }
        .into());
    }
    let filter = StringJobFilter {
        stringer_id: Some(stringer_id),
        ..Default::default()
    };
    list_filtered(&state.pool, &filter).await
}

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

/// POST /api/string-jobs
///
/// Checks, in order: player exists, racquet exists and belongs to the player,
/// then the optional string, stringer and tournament references.
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateStringJob>,
) -> AppResult<(StatusCode, Json<StringJobDetails>)> {
    if !PlayerRepo::exists(&state.pool, input.player_id).await? {
        return Err(
            CoreError::Validation(format!("Player {} does not exist", input.player_id)).into(),
        );
    }

    let racquet = RacquetRepo::find_by_id(&state.pool, input.racquet_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Racquet {} does not exist", input.racquet_id))
        })?;
    if racquet.player_id != input.player_id {
        return Err(CoreError::Validation(format!(
            "Racquet {} does not belong to player {}",
            racquet.id, input.player_id
        ))
        .into());
    }

    validate_references(
        &state.pool,
        input.main_string_id,
        input.cross_string_id,
        input.stringer_id,
        input.tournament_id,
    )
    .await?;
    validate_tensions(input.main_tension, input.cross_tension)?;
    validate_priority(input.priority)?;
    validate_price(input.price)?;

    let new_job = NewStringJob {
        player_id: input.player_id,
        racquet_id: input.racquet_id,
        main_string_id: input.main_string_id,
        cross_string_id: input.cross_string_id,
        stringer_id: input.stringer_id,
        tournament_id: input.tournament_id,
        main_tension: input.main_tension,
        cross_tension: input.cross_tension,
        is_tension_in_kg: input.is_tension_in_kg,
        logo: optional_text(input.logo.as_deref()),
        notes: optional_text(input.notes.as_deref()),
        priority: input.priority,
        due_date: input.due_date,
        price: input.price.unwrap_or_else(default_price),
        created_at: state.clock.now(),
    };

    let job = StringJobRepo::create(&state.pool, &new_job).await?;
    tracing::info!(
        job_id = job.id,
        player_id = job.player_id,
        racquet_id = job.racquet_id,
        user_id = user.user_id,
        "String job created"
    );

    let details = load_details(&state.pool, job.id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// PUT /api/string-jobs/{id}
///
/// Open jobs only. `status` may be echoed but not changed here.
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStringJob>,
) -> AppResult<Json<StringJobDetails>> {
    let job = ensure_job_exists(&state.pool, id).await?;
    let status = job.job_status()?;

    if let Err(err) = check_update(status) {
        tracing::warn!(job_id = id, status = %status, "String job update rejected");
        return Err(err.into());
    }
    check_update_status(status, input.status.as_deref())?;
    validate_references(
        &state.pool,
        input.main_string_id,
        input.cross_string_id,
        input.stringer_id,
        None,
    )
    .await?;
    validate_tensions(input.main_tension, input.cross_tension)?;
    validate_priority(input.priority)?;
    validate_price(input.price)?;

    let changes = StringJobChanges {
        main_string_id: input.main_string_id,
        cross_string_id: input.cross_string_id,
        stringer_id: input.stringer_id,
        main_tension: input.main_tension,
        cross_tension: input.cross_tension,
        is_tension_in_kg: input.is_tension_in_kg,
        logo: optional_text(input.logo.as_deref()),
        due_date: input.due_date,
        notes: optional_text(input.notes.as_deref()),
        priority: input.priority,
        price: input.price,
    };

    let outcome = StringJobRepo::update_fields(&state.pool, id, job.version, &changes).await?;
    settle(&state.pool, id, outcome).await?;

    tracing::info!(job_id = id, user_id = user.user_id, "String job updated");
    Ok(Json(load_details(&state.pool, id).await?))
}

/// DELETE /api/string-jobs/{id}
///
/// Pending jobs only.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let job = ensure_job_exists(&state.pool, id).await?;
    let status = job.job_status()?;

    if let Err(err) = check_delete(status) {
        tracing::warn!(job_id = id, status = %status, "String job delete rejected");
        return Err(err.into());
    }

    let deleted = StringJobRepo::delete(&state.pool, id, job.version).await?;
    versioned::resolve(&state.pool, StringJobRepo::TABLE, id, deleted.then_some(()))
        .await?
        .into_core(ENTITY, id)?;

    tracing::info!(job_id = id, user_id = user.user_id, "String job deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// PATCH /api/string-jobs/{id}/start
pub async fn start(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StringJobDetails>> {
    let job = ensure_job_exists(&state.pool, id).await?;
    let current = job.job_status()?;

    let next = check_start(current).inspect_err(|_| {
        tracing::warn!(job_id = id, status = %current, "String job start rejected");
    })?;

    let outcome = StringJobRepo::transition(
        &state.pool,
        id,
        job.version,
        next,
        job.completed_at,
        job.notes.as_deref(),
    )
    .await?;
    settle(&state.pool, id, outcome).await?;

    tracing::info!(job_id = id, user_id = user.user_id, "String job started");
    Ok(Json(load_details(&state.pool, id).await?))
}

/// PATCH /api/string-jobs/{id}/complete
///
/// Completion notes are appended to existing notes, never replace them.
pub async fn complete(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<CompleteJobRequest>>,
) -> AppResult<Json<StringJobDetails>> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let job = ensure_job_exists(&state.pool, id).await?;
    let current = job.job_status()?;

    let next = check_complete(current).inspect_err(|_| {
        tracing::warn!(job_id = id, status = %current, "String job completion rejected");
    })?;

    let completed_at = input.completed_at.unwrap_or_else(|| state.clock.now());
    let notes = completion_notes(job.notes.as_deref(), input.notes.as_deref());

    let outcome = StringJobRepo::transition(
        &state.pool,
        id,
        job.version,
        next,
        Some(completed_at),
        notes.as_deref(),
    )
    .await?;
    settle(&state.pool, id, outcome).await?;

    tracing::info!(
        job_id = id,
        user_id = user.user_id,
        completed_at = %completed_at,
        "String job completed"
    );
    Ok(Json(load_details(&state.pool, id).await?))
}

/// PATCH /api/string-jobs/{id}/cancel
///
/// The body, and the reason in it, are optional.
pub async fn cancel(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<CancelJobRequest>>,
) -> AppResult<Json<StringJobDetails>> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let job = ensure_job_exists(&state.pool, id).await?;
    let current = job.job_status()?;

    let next = check_cancel(current).inspect_err(|_| {
        tracing::warn!(job_id = id, status = %current, "String job cancellation rejected");
    })?;

    let notes = cancellation_notes(job.notes.as_deref(), input.reason.as_deref());

    let outcome =
        StringJobRepo::transition(&state.pool, id, job.version, next, None, notes.as_deref())
            .await?;
    settle(&state.pool, id, outcome).await?;

    tracing::info!(job_id = id, user_id = user.user_id, "String job cancelled");
    Ok(Json(load_details(&state.pool, id).await?))
}

/// PATCH /api/string-jobs/{id}/paid
///
/// Completed jobs only. Marking an already paid job again is a no-op.
pub async fn mark_paid(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StringJobDetails>> {
    let job = ensure_job_exists(&state.pool, id).await?;
    let current = job.job_status()?;

    check_mark_paid(current).inspect_err(|_| {
        tracing::warn!(job_id = id, status = %current, "String job payment rejected");
    })?;

    if !job.is_paid {
        let outcome = StringJobRepo::mark_paid(&state.pool, id, job.version).await?;
        settle(&state.pool, id, outcome).await?;
        tracing::info!(job_id = id, user_id = user.user_id, "String job marked as paid");
    }

    Ok(Json(load_details(&state.pool, id).await?))
}
