//! Handlers for the `/labels` resource: printable racquet labels and QR data.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use stringdesk_core::error::CoreError;
use stringdesk_core::label::{
    build_label, qr_code_data, BrandModel, Label, LabelOptions, LabelSize, LabelSource,
};
use stringdesk_core::types::DbId;
use stringdesk_db::models::string_job::StringJobDetails;
use stringdesk_db::models::string_type::StringType;
use stringdesk_db::repositories::StringJobRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

fn default_true() -> bool {
    true
}

/// Body for `POST /labels`. Every section is included unless turned off.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    pub job_id: DbId,
    #[serde(default = "default_true")]
    pub include_player_info: bool,
    #[serde(default = "default_true")]
    pub include_racquet_info: bool,
    #[serde(default = "default_true")]
    pub include_string_info: bool,
    #[serde(default = "default_true")]
    pub include_tension_info: bool,
    #[serde(default = "default_true")]
    pub include_date_info: bool,
    #[serde(default = "default_true")]
    pub include_logo: bool,
    #[serde(default = "default_true")]
    pub generate_qr_code: bool,
    #[serde(default)]
    pub label_size: LabelSize,
}

impl LabelRequest {
    fn options(&self) -> LabelOptions {
        LabelOptions {
            player: self.include_player_info,
            racquet: self.include_racquet_info,
            strings: self.include_string_info,
            tension: self.include_tension_info,
            date: self.include_date_info,
            logo: self.include_logo,
            qr_code: self.generate_qr_code,
            size: self.label_size,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    pub job_id: DbId,
    pub qr_code_data: String,
}

fn brand_model(string: &StringType) -> BrandModel {
    BrandModel {
        id: string.id,
        brand: string.brand.clone(),
        model: string.model.clone(),
    }
}

/// Flatten a hydrated job into the label's input. Player and racquet are
/// required columns, so their absence means the join itself went wrong.
fn label_source(details: &StringJobDetails) -> Result<LabelSource, CoreError> {
    let job = &details.job;
    let player = details.player.as_ref().ok_or_else(|| {
        CoreError::Internal(format!("Job {} has no resolvable player", job.id))
    })?;
    let racquet = details.racquet.as_ref().ok_or_else(|| {
        CoreError::Internal(format!("Job {} has no resolvable racquet", job.id))
    })?;

    Ok(LabelSource {
        job_id: job.id,
        player_name: player.name.clone(),
        player_last_name: player.last_name.clone(),
        racquet: BrandModel {
            id: racquet.id,
            brand: racquet.brand.clone(),
            model: racquet.model.clone(),
        },
        main_string: details.main_string.as_ref().map(brand_model),
        cross_string: details.cross_string.as_ref().map(brand_model),
        main_tension: job.main_tension,
        cross_tension: job.cross_tension,
        is_tension_in_kg: job.is_tension_in_kg,
        logo: job.logo.clone(),
        created_at: job.created_at,
        completed_at: job.completed_at,
    })
}

async fn load_source(pool: &sqlx::PgPool, job_id: DbId) -> AppResult<LabelSource> {
    let details = StringJobRepo::find_details(pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StringJob",
            id: job_id,
        }))?;
    Ok(label_source(&details)?)
}

/// POST /api/labels
pub async fn generate(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<LabelRequest>,
) -> AppResult<Json<Label>> {
    let source = load_source(&state.pool, input.job_id).await?;
    let label = build_label(&source, &input.options())?;
    tracing::debug!(job_id = input.job_id, user_id = user.user_id, "Label generated");
    Ok(Json(label))
}

/// GET /api/labels/{jobId}/qrcode
pub async fn qr_code(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<QrCodeResponse>> {
    let source = load_source(&state.pool, job_id).await?;
    Ok(Json(QrCodeResponse {
        job_id,
        qr_code_data: qr_code_data(&source)?,
    }))
}
