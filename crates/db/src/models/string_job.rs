//! Stringing job model, DTOs and the hydrated read shape.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stringdesk_core::datetime::deserialize_optional_timestamp;
use stringdesk_core::error::CoreError;
use stringdesk_core::string_job::JobStatus;
use stringdesk_core::types::{DbId, RowVersion, Timestamp};

use crate::models::player::Player;
use crate::models::racquet::Racquet;
use crate::models::string_type::StringType;
use crate::models::stringer::Stringer;
use crate::models::tournament::Tournament;

/// Price charged when the caller does not quote one.
pub fn default_price() -> Decimal {
    Decimal::new(2500, 2)
}

fn default_true() -> bool {
    true
}

/// A row from the `string_jobs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringJob {
    pub id: DbId,
    pub player_id: DbId,
    pub racquet_id: DbId,
    pub main_string_id: Option<DbId>,
    pub cross_string_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub tournament_id: Option<DbId>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    /// One of `Pending`, `InProgress`, `Completed`, `Cancelled` (CHECK constraint).
    pub status: String,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub price: Decimal,
    pub is_paid: bool,
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub version: RowVersion,
}

impl StringJob {
    pub fn job_status(&self) -> Result<JobStatus, CoreError> {
        self.status.parse()
    }
}

/// Request body for creating a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStringJob {
    pub player_id: DbId,
    pub racquet_id: DbId,
    pub main_string_id: Option<DbId>,
    pub cross_string_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub tournament_id: Option<DbId>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    #[serde(default = "default_true")]
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<Timestamp>,
    pub price: Option<Decimal>,
}

/// Validated insert. `created_at` comes from the injected clock.
#[derive(Debug, Clone)]
pub struct NewStringJob {
    pub player_id: DbId,
    pub racquet_id: DbId,
    pub main_string_id: Option<DbId>,
    pub cross_string_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub tournament_id: Option<DbId>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    pub due_date: Option<Timestamp>,
    pub price: Decimal,
    pub created_at: Timestamp,
}

/// Request body for a general job update.
///
/// String and stringer references are replaced only when present. `status`
/// may only echo the current status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStringJob {
    pub main_string_id: Option<DbId>,
    pub cross_string_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    #[serde(default = "default_true")]
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<Timestamp>,
    pub price: Option<Decimal>,
    pub status: Option<String>,
}

/// Optional query filters for job listings. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct StringJobFilter {
    pub status: Option<JobStatus>,
    pub tournament_id: Option<DbId>,
    pub player_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub unpaid_only: bool,
}

/// A job with every reference resolved, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringJobDetails {
    #[serde(flatten)]
    pub job: StringJob,
    pub player: Option<Player>,
    pub racquet: Option<Racquet>,
    pub main_string: Option<StringType>,
    pub cross_string: Option<StringType>,
    pub stringer: Option<Stringer>,
    pub tournament: Option<Tournament>,
}

/// Flat row produced by the hydrating join; see [`StringJobJoinedRow::into_details`].
#[derive(Debug, Clone, FromRow)]
pub struct StringJobJoinedRow {
    #[sqlx(flatten)]
    pub job: StringJob,

    pub p_name: Option<String>,
    pub p_last_name: Option<String>,
    pub p_country_code: Option<String>,
    pub p_version: Option<RowVersion>,

    pub r_player_id: Option<DbId>,
    pub r_brand: Option<String>,
    pub r_model: Option<String>,
    pub r_serial_number: Option<String>,
    pub r_head_size: Option<f64>,
    pub r_notes: Option<String>,
    pub r_version: Option<RowVersion>,

    pub ms_brand: Option<String>,
    pub ms_model: Option<String>,
    pub ms_gauge: Option<String>,
    pub ms_material: Option<String>,
    pub ms_color: Option<String>,
    pub ms_version: Option<RowVersion>,

    pub cs_brand: Option<String>,
    pub cs_model: Option<String>,
    pub cs_gauge: Option<String>,
    pub cs_material: Option<String>,
    pub cs_color: Option<String>,
    pub cs_version: Option<RowVersion>,

    pub sg_name: Option<String>,
    pub sg_last_name: Option<String>,
    pub sg_email: Option<String>,
    pub sg_phone_number: Option<String>,
    pub sg_version: Option<RowVersion>,

    pub t_name: Option<String>,
    pub t_start_date: Option<NaiveDate>,
    pub t_end_date: Option<NaiveDate>,
    pub t_location: Option<String>,
    pub t_category: Option<String>,
    pub t_version: Option<RowVersion>,
}

impl StringJobJoinedRow {
    /// The single place a joined row becomes the API shape.
    pub fn into_details(self) -> StringJobDetails {
        let job = self.job;

        let player = match (self.p_name, self.p_last_name, self.p_version) {
            (Some(name), Some(last_name), Some(version)) => Some(Player {
                id: job.player_id,
                name,
                last_name,
                country_code: self.p_country_code,
                version,
            }),
            _ => None,
        };

        let racquet = match (self.r_player_id, self.r_brand, self.r_model, self.r_version) {
            (Some(player_id), Some(brand), Some(model), Some(version)) => Some(Racquet {
                id: job.racquet_id,
                player_id,
                brand,
                model,
                serial_number: self.r_serial_number,
                head_size: self.r_head_size,
                notes: self.r_notes,
                version,
            }),
            _ => None,
        };

        let main_string = match (job.main_string_id, self.ms_brand, self.ms_model, self.ms_version) {
            (Some(id), Some(brand), Some(model), Some(version)) => Some(StringType {
                id,
                brand,
                model,
                gauge: self.ms_gauge,
                material: self.ms_material,
                color: self.ms_color,
                version,
            }),
            _ => None,
        };

        let cross_string =
            match (job.cross_string_id, self.cs_brand, self.cs_model, self.cs_version) {
                (Some(id), Some(brand), Some(model), Some(version)) => Some(StringType {
                    id,
                    brand,
                    model,
                    gauge: self.cs_gauge,
                    material: self.cs_material,
                    color: self.cs_color,
                    version,
                }),
                _ => None,
            };

        let stringer = match (job.stringer_id, self.sg_name, self.sg_last_name, self.sg_version) {
            (Some(id), Some(name), Some(last_name), Some(version)) => Some(Stringer {
                id,
                name,
                last_name,
                email: self.sg_email,
                phone_number: self.sg_phone_number,
                version,
            }),
            _ => None,
        };

        let tournament = match (
            job.tournament_id,
            self.t_name,
            self.t_start_date,
            self.t_end_date,
            self.t_version,
        ) {
            (Some(id), Some(name), Some(start_date), Some(end_date), Some(version)) => {
                Some(Tournament {
                    id,
                    name,
                    start_date,
                    end_date,
                    location: self.t_location,
                    category: self.t_category,
                    version,
                })
            }
            _ => None,
        };

        StringJobDetails {
            job,
            player,
            racquet,
            main_string,
            cross_string,
            stringer,
            tournament,
        }
    }
}
