//! Route definitions for the `/string-jobs` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::string_job;
use crate::state::AppState;

/// Routes mounted at `/string-jobs`.
///
/// ```text
/// GET    /                         -> list (?status=, ?tournamentId=)
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// PATCH  /{id}/start               -> start
/// PATCH  /{id}/complete            -> complete
/// PATCH  /{id}/cancel              -> cancel
/// PATCH  /{id}/paid                -> mark_paid
/// GET    /player/{id}              -> list_by_player
/// GET    /player/{id}/unpaid       -> list_unpaid_by_player
/// GET    /stringer/{id}            -> list_by_stringer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(string_job::list).post(string_job::create))
        .route(
            "/{id}",
            get(string_job::get_by_id)
                .put(string_job::update)
                .delete(string_job::delete),
        )
        .route("/{id}/start", patch(string_job::start))
        .route("/{id}/complete", patch(string_job::complete))
        .route("/{id}/cancel", patch(string_job::cancel))
        .route("/{id}/paid", patch(string_job::mark_paid))
        .route("/player/{id}", get(string_job::list_by_player))
        .route("/player/{id}/unpaid", get(string_job::list_unpaid_by_player))
        .route("/stringer/{id}", get(string_job::list_by_stringer))
}
