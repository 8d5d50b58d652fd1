//! Handlers for the `/stringers` resource. Writes are Admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::{optional_text, require_text};
use stringdesk_db::models::stringer::{CreateStringer, Stringer, UpdateStringer};
use stringdesk_db::repositories::StringerRepo;
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

async fn ensure_stringer_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Stringer> {
    StringerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Stringer",
            id,
        }))
}

fn normalize(input: CreateStringer) -> Result<CreateStringer, CoreError> {
    Ok(CreateStringer {
        name: require_text("Name", &input.name)?,
        last_name: require_text("Last name", &input.last_name)?,
        email: optional_text(input.email.as_deref()),
        phone_number: optional_text(input.phone_number.as_deref()),
    })
}

/// GET /api/stringers
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Stringer>>> {
    Ok(Json(StringerRepo::list(&state.pool).await?))
}

/// GET /api/stringers/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Stringer>> {
    Ok(Json(ensure_stringer_exists(&state.pool, id).await?))
}

/// POST /api/stringers
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStringer>,
) -> AppResult<(StatusCode, Json<Stringer>)> {
    let input = normalize(input)?;
    let stringer = StringerRepo::create(&state.pool, &input).await?;
    tracing::info!(stringer_id = stringer.id, user_id = user.user_id, "Stringer created");
    Ok((StatusCode::CREATED, Json(stringer)))
}

/// PUT /api/stringers/{id}
pub async fn update(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStringer>,
) -> AppResult<Json<Stringer>> {
    let input = normalize(input)?;
    let current = ensure_stringer_exists(&state.pool, id).await?;

    let outcome = StringerRepo::update(&state.pool, id, current.version, &input).await?;
    let stringer = versioned::resolve(&state.pool, StringerRepo::TABLE, id, outcome)
        .await?
        .into_core("Stringer", id)?;

    tracing::info!(stringer_id = id, user_id = user.user_id, "Stringer updated");
    Ok(Json(stringer))
}

/// DELETE /api/stringers/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_stringer_exists(&state.pool, id).await?;

    let jobs = StringerRepo::count_jobs(&state.pool, id).await?;
    if jobs > 0 {
        tracing::warn!(stringer_id = id, jobs, "Stringer delete blocked");
        return Err(CoreError::Guard(format!(
            "Cannot delete stringer: {jobs} job(s) are assigned to them"
        ))
        .into());
    }

    if !StringerRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Stringer", id }.into());
    }
    tracing::info!(stringer_id = id, user_id = user.user_id, "Stringer deleted");
    Ok(StatusCode::NO_CONTENT)
}
