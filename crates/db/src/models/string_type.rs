//! String type entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::{DbId, RowVersion};

/// A row from the `string_types` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringType {
    pub id: DbId,
    pub brand: String,
    pub model: String,
    pub gauge: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

/// DTO for creating a string type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStringType {
    pub brand: String,
    pub model: String,
    pub gauge: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
}

pub type UpdateStringType = CreateStringType;
