//! Player entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::{DbId, RowVersion};

/// A row from the `players` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: DbId,
    pub name: String,
    pub last_name: String,
    pub country_code: Option<String>,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

/// DTO for creating a player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayer {
    pub name: String,
    pub last_name: String,
    pub country_code: Option<String>,
}

/// DTO for replacing a player's fields.
pub type UpdatePlayer = CreatePlayer;
