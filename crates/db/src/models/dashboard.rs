//! Read-only aggregate rows for the dashboard.

use serde::Serialize;
use sqlx::FromRow;
use stringdesk_core::types::DbId;

/// Entity ranked by a job count (top stringers, players, strings).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntity {
    pub id: DbId,
    pub name: String,
    pub job_count: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCount {
    pub brand: String,
    pub count: i64,
}
