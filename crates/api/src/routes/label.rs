//! Route definitions for the `/labels` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::label;
use crate::state::AppState;

/// Routes mounted at `/labels`.
///
/// ```text
/// POST /                  -> generate
/// GET  /{jobId}/qrcode    -> qr_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(label::generate))
        .route("/{job_id}/qrcode", get(label::qr_code))
}
