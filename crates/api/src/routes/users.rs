//! Route definitions for the `/users` resource (Admin only).

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// POST   /{id}/change-password    -> change_password
/// PATCH  /{id}/role               -> set_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        )
        .route("/{id}/change-password", post(users::change_password))
        .route("/{id}/role", patch(users::set_role))
}
