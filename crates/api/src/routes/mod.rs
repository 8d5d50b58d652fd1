pub mod auth;
pub mod dashboard;
pub mod health;
pub mod label;
pub mod player;
pub mod racquet;
pub mod string_job;
pub mod string_type;
pub mod stringer;
pub mod tournament;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
/// /auth/user                              current user
/// /auth/change-password                   change own password
/// /auth/refresh-user-data                 re-issue token with current role
///
/// /users                                  list, create (admin only)
/// /users/{id}                             get, update, delete
/// /users/{id}/change-password             reset password
/// /users/{id}/role                        change role (PATCH)
///
/// /players                                list, create
/// /players/{id}                           get, update, delete
/// /racquets?playerId=                     list, create
/// /racquets/{id}                          get, update, delete
/// /string-types                           list, create
/// /string-types/{id}                      get, update, delete
/// /stringers                              list, create
/// /stringers/{id}                         get, update, delete
/// /tournaments                            list, create
/// /tournaments/current                    active tournament (204 if none)
/// /tournaments/{id}                       get, update, delete
///
/// /string-jobs?status=&tournamentId=      list, create
/// /string-jobs/{id}                       get, update, delete
/// /string-jobs/{id}/start                 PATCH
/// /string-jobs/{id}/complete              PATCH
/// /string-jobs/{id}/cancel                PATCH
/// /string-jobs/{id}/paid                  PATCH
/// /string-jobs/player/{id}                jobs of a player
/// /string-jobs/player/{id}/unpaid         completed, unpaid jobs of a player
/// /string-jobs/stringer/{id}              jobs of a stringer
///
/// /dashboard/stats                        counters and rankings
/// /dashboard/distribution?tournamentId=   status, tension and brand breakdowns
///
/// /labels                                 generate label (POST)
/// /labels/{jobId}/qrcode                  QR payload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/players", player::router())
        .nest("/racquets", racquet::router())
        .nest("/string-types", string_type::router())
        .nest("/stringers", stringer::router())
        .nest("/tournaments", tournament::router())
        .nest("/string-jobs", string_job::router())
        .nest("/dashboard", dashboard::router())
        .nest("/labels", label::router())
}
