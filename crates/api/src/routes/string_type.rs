//! Route definitions for the `/string-types` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::string_type;
use crate::state::AppState;

/// Routes mounted at `/string-types`.
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
        .route("/", get(string_type::list).post(string_type::create))
        .route(
            "/{id}",
            get(string_type::get_by_id)
                .put(string_type::update)
                .delete(string_type::delete),
        )
}
