//! Handlers for the `/auth` resource (register, login, current user).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stringdesk_core::error::CoreError;
use stringdesk_core::roles::DEFAULT_ROLE;
use stringdesk_core::types::{DbId, Timestamp};
use stringdesk_core::validation::require_text;
use stringdesk_db::models::user::{CreateUser, User, UserResponse};
use stringdesk_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Token response returned by register, login and refresh-user-data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expiration: Timestamp,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Shared rules (also used by the admin user handlers)
// ---------------------------------------------------------------------------

/// Trim and check username and email, and reject values other users hold.
pub(crate) async fn validate_identity(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    exclude_id: Option<DbId>,
) -> AppResult<(String, String)> {
    let username = require_text("Username", username)?;
    let email = require_text("Email", email)?;
    if !email.contains('@') {
        return Err(CoreError::Validation("Email address is not valid".into()).into());
    }

    if UserRepo::username_taken(pool, &username, exclude_id).await? {
        return Err(CoreError::Validation(format!("Username '{username}' is already taken")).into());
    }
    if UserRepo::email_taken(pool, &email, exclude_id).await? {
        return Err(CoreError::Validation(format!("Email '{email}' is already registered")).into());
    }
    Ok((username, email))
}

/// Check strength and hash a new password.
pub(crate) fn hash_new_password(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(CoreError::Validation)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

fn ensure_passwords_match(password: &str, confirm: &str) -> Result<(), CoreError> {
    if password != confirm {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let issued = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token: issued.token,
        expiration: issued.expires_at,
        user: UserResponse::from(user),
    })
}

async fn load_active_user(pool: &sqlx::PgPool, user_id: DbId) -> AppResult<User> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(user)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Self-registration. New accounts get the default role.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    ensure_passwords_match(&input.password, &input.confirm_password)?;
    let (username, email) = validate_identity(&state.pool, &input.username, &input.email, None).await?;
    let password_hash = hash_new_password(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
            created_at: state.clock.now(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// POST /api/auth/login
///
/// Unknown users and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    // Registration stores trimmed usernames.
    let mut user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        tracing::warn!(user_id = user.id, "Login attempt on deactivated account");
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Failed login");
        return Err(invalid());
    }

    let now = state.clock.now();
    UserRepo::record_login(&state.pool, user.id, now).await?;
    user.last_login_at = Some(now);

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(issue_token(&state, &user)?))
}

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = load_active_user(&state.pool, auth_user.user_id).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(CoreError::Validation("Current password is incorrect".into()).into());
    }
    ensure_passwords_match(&input.new_password, &input.confirm_password)?;
    let password_hash = hash_new_password(&input.new_password)?;

    if !UserRepo::update_password(&state.pool, user.id, &password_hash).await? {
        return Err(CoreError::NotFound { entity: "User", id: user.id }.into());
    }
    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/refresh-user-data
///
/// Re-issue a token carrying the role currently stored for the user.
pub async fn refresh_user_data(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<AuthResponse>> {
    let user = load_active_user(&state.pool, auth_user.user_id).await?;
    if user.role != auth_user.role {
        tracing::info!(
            user_id = user.id,
            old_role = %auth_user.role,
            new_role = %user.role,
            "Role changed since token was issued"
        );
    }
    Ok(Json(issue_token(&state, &user)?))
}
