//! Route definitions for the `/stringers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::stringer;
use crate::state::AppState;

/// Routes mounted at `/stringers`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stringer::list).post(stringer::create))
        .route(
            "/{id}",
            get(stringer::get_by_id)
                .put(stringer::update)
                .delete(stringer::delete),
        )
}
