//! Stringer (technician) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::{DbId, RowVersion};

/// A row from the `stringers` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stringer {
    pub id: DbId,
    pub name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStringer {
    pub name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

pub type UpdateStringer = CreateStringer;
