//! Handlers for the `/users` resource. Every route is Admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stringdesk_core::error::CoreError;
use stringdesk_core::roles::DEFAULT_ROLE;
use stringdesk_core::types::DbId;
use stringdesk_core::validation::require_text;
use stringdesk_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use stringdesk_db::repositories::UserRepo;
use stringdesk_db::versioned;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::{hash_new_password, validate_identity};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to the self-registration role.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

async fn ensure_user_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// GET /api/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = ensure_user_exists(&state.pool, id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let role = match input.role.as_deref() {
        Some(role) => require_text("Role", role)?,
        None => DEFAULT_ROLE.to_string(),
    };
    let (username, email) = validate_identity(&state.pool, &input.username, &input.email, None).await?;
    let password_hash = hash_new_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role,
            created_at: state.clock.now(),
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        admin_id = admin.user_id,
        "User created by admin"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /api/users/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let current = ensure_user_exists(&state.pool, id).await?;
    let (username, email) =
        validate_identity(&state.pool, &input.username, &input.email, Some(id)).await?;

    let changes = UpdateUser {
        username,
        email,
        is_active: input.is_active,
    };
    let outcome = UserRepo::update(&state.pool, id, current.version, &changes).await?;
    let user = versioned::resolve(&state.pool, UserRepo::TABLE, id, outcome)
        .await?
        .into_core("User", id)?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/{id}
///
/// An admin cannot remove their own account.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        tracing::warn!(user_id = id, "Admin attempted to delete own account");
        return Err(CoreError::Guard("You cannot delete your own account".into()).into());
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{id}/change-password
///
/// Admin reset; the current password is not required.
pub async fn change_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    let password_hash = hash_new_password(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    tracing::info!(user_id = id, admin_id = admin.user_id, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/users/{id}/role
///
/// Takes effect in the user's next token.
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = require_text("Role", &input.role)?;
    let user = UserRepo::update_role(&state.pool, id, &role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, role = %role, admin_id = admin.user_id, "User role changed");
    Ok(Json(UserResponse::from(&user)))
}
