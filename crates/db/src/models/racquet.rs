//! Racquet entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::player::Player;

/// A row from the `racquets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Racquet {
    pub id: DbId,
    pub player_id: DbId,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub head_size: Option<f64>,
    pub notes: Option<String>,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

/// A racquet together with its owner, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RacquetWithPlayer {
    #[serde(flatten)]
    pub racquet: Racquet,
    pub player: Option<Player>,
}

/// DTO for creating a racquet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRacquet {
    pub player_id: DbId,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub head_size: Option<f64>,
    pub notes: Option<String>,
}

/// DTO for replacing a racquet's fields. Ownership is fixed at creation, so
/// every job recorded against the racquet keeps a matching player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRacquet {
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub head_size: Option<f64>,
    pub notes: Option<String>,
}

/// Racquet row joined with its owner's columns.
#[derive(Debug, Clone, FromRow)]
pub struct RacquetJoinedRow {
    #[sqlx(flatten)]
    pub racquet: Racquet,
    pub p_name: Option<String>,
    pub p_last_name: Option<String>,
    pub p_country_code: Option<String>,
    pub p_version: Option<RowVersion>,
}

impl RacquetJoinedRow {
    pub fn into_with_player(self) -> RacquetWithPlayer {
        let player = match (self.p_name, self.p_last_name, self.p_version) {
            (Some(name), Some(last_name), Some(version)) => Some(Player {
                id: self.racquet.player_id,
                name,
                last_name,
                country_code: self.p_country_code,
                version,
            }),
            _ => None,
        };
        RacquetWithPlayer {
            racquet: self.racquet,
            player,
        }
    }
}
