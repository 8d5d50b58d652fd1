//! Handlers for the `/string-types` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::{optional_text, require_text};
use stringdesk_db::models::string_type::{CreateStringType, StringType, UpdateStringType};
use stringdesk_db::repositories::StringTypeRepo;
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::state::AppState;

async fn ensure_string_type_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<StringType> {
    StringTypeRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StringType",
            id,
        }))
}

fn normalize(input: CreateStringType) -> Result<CreateStringType, CoreError> {
    Ok(CreateStringType {
        brand: require_text("Brand", &input.brand)?,
        model: require_text("Model", &input.model)?,
        gauge: optional_text(input.gauge.as_deref()),
        material: optional_text(input.material.as_deref()),
        color: optional_text(input.color.as_deref()),
    })
}

/// GET /api/string-types
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StringType>>> {
    Ok(Json(StringTypeRepo::list(&state.pool).await?))
}

/// GET /api/string-types/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StringType>> {
    Ok(Json(ensure_string_type_exists(&state.pool, id).await?))
}

/// POST /api/string-types
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateStringType>,
) -> AppResult<(StatusCode, Json<StringType>)> {
    let input = normalize(input)?;
    let string_type = StringTypeRepo::create(&state.pool, &input).await?;
    tracing::info!(
        string_type_id = string_type.id,
        user_id = user.user_id,
        "String type created"
    );
    Ok((StatusCode::CREATED, Json(string_type)))
}

/// PUT /api/string-types/{id}
pub async fn update(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStringType>,
) -> AppResult<Json<StringType>> {
    let input = normalize(input)?;
    let current = ensure_string_type_exists(&state.pool, id).await?;

    let outcome = StringTypeRepo::update(&state.pool, id, current.version, &input).await?;
    let string_type = versioned::resolve(&state.pool, StringTypeRepo::TABLE, id, outcome)
        .await?
        .into_core("StringType", id)?;

    tracing::info!(string_type_id = id, user_id = user.user_id, "String type updated");
    Ok(Json(string_type))
}

/// DELETE /api/string-types/{id}
///
/// Blocked while any job uses the string as main or cross.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_string_type_exists(&state.pool, id).await?;

    let jobs = StringTypeRepo::count_jobs(&state.pool, id).await?;
    if jobs > 0 {
        tracing::warn!(string_type_id = id, jobs, "String type delete blocked");
        return Err(CoreError::Guard(format!(
            "Cannot delete string type: {jobs} job(s) use it"
        ))
        .into());
    }

    if !StringTypeRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "StringType", id }.into());
    }
    tracing::info!(string_type_id = id, user_id = user.user_id, "String type deleted");
    Ok(StatusCode::NO_CONTENT)
}
