//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register            -> register (public)
/// POST /login               -> login (public)
/// GET  /user                -> current_user
/// POST /change-password     -> change_password
/// POST /refresh-user-data   -> refresh_user_data
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/user", get(auth::current_user))
        .route("/change-password", post(auth::change_password))
        .route("/refresh-user-data", post(auth::refresh_user_data))
}
