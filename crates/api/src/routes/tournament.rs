//! Route definitions for the `/tournaments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tournament;
use crate::state::AppState;

/// Routes mounted at `/tournaments`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// GET    /current    -> current
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tournament::list).post(tournament::create))
        .route("/current", get(tournament::current))
        .route(
            "/{id}",
            get(tournament::get_by_id)
                .put(tournament::update)
                .delete(tournament::delete),
        )
}
