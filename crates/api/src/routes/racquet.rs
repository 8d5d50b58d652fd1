//! Route definitions for the `/racquets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::racquet;
use crate::state::AppState;

/// Routes mounted at `/racquets`.
///
/// ```text
/// GET    /        -> list (optional ?playerId=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(racquet::list).post(racquet::create))
        .route(
            "/{id}",
            get(racquet::get_by_id)
                .put(racquet::update)
                .delete(racquet::delete),
        )
}
