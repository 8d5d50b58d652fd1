//! Tournament entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::types::{DbId, RowVersion};

/// A row from the `tournaments` table. Dates are inclusive calendar days.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: DbId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournament {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: Option<String>,
    pub category: Option<String>,
}

pub type UpdateTournament = CreateTournament;
