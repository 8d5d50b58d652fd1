//! Repository for the `string_jobs` table.
//!
//! Every status change is a single statement guarded by `version`, so the
//! status, `completed_at` and `notes` move together or not at all.

use rust_decimal::Decimal;
use sqlx::PgPool;
use stringdesk_core::string_job::JobStatus;
use stringdesk_core::types::{DbId, RowVersion, Timestamp};

use crate::models::string_job::{
    NewStringJob, StringJob, StringJobDetails, StringJobFilter, StringJobJoinedRow,
};

const COLUMNS: &str = "id, player_id, racquet_id, main_string_id, cross_string_id, stringer_id, \
                       tournament_id, main_tension, cross_tension, is_tension_in_kg, logo, status, \
                       notes, priority, due_date, completed_at, price, is_paid, created_at, version";

/// Job columns plus prefixed columns of every referenced row.
const JOINED_SELECT: &str = "SELECT
        j.id, j.player_id, j.racquet_id, j.main_string_id, j.cross_string_id, j.stringer_id,
        j.tournament_id, j.main_tension, j.cross_tension, j.is_tension_in_kg, j.logo, j.status,
        j.notes, j.priority, j.due_date, j.completed_at, j.price, j.is_paid, j.created_at,
        j.version,
        p.name AS p_name, p.last_name AS p_last_name, p.country_code AS p_country_code,
        p.version AS p_version,
        r.player_id AS r_player_id, r.brand AS r_brand, r.model AS r_model,
        r.serial_number AS r_serial_number, r.head_size AS r_head_size, r.notes AS r_notes,
        r.version AS r_version,
        ms.brand AS ms_brand, ms.model AS ms_model, ms.gauge AS ms_gauge,
        ms.material AS ms_material, ms.color AS ms_color, ms.version AS ms_version,
        cs.brand AS cs_brand, cs.model AS cs_model, cs.gauge AS cs_gauge,
        cs.material AS cs_material, cs.color AS cs_color, cs.version AS cs_version,
        sg.name AS sg_name, sg.last_name AS sg_last_name, sg.email AS sg_email,
        sg.phone_number AS sg_phone_number, sg.version AS sg_version,
        t.name AS t_name, t.start_date AS t_start_date, t.end_date AS t_end_date,
        t.location AS t_location, t.category AS t_category, t.version AS t_version
     FROM string_jobs j
     LEFT JOIN players p ON p.id = j.player_id
     LEFT JOIN racquets r ON r.id = j.racquet_id
     LEFT JOIN string_types ms ON ms.id = j.main_string_id
     LEFT JOIN string_types cs ON cs.id = j.cross_string_id
     LEFT JOIN stringers sg ON sg.id = j.stringer_id
     LEFT JOIN tournaments t ON t.id = j.tournament_id";

/// Priority value descending with unprioritised jobs last, then newest first.
const DEFAULT_ORDER: &str = "ORDER BY j.priority DESC NULLS LAST, j.created_at DESC, j.id DESC";

/// Field overwrite applied by a general update.
#[derive(Debug, Clone)]
pub struct StringJobChanges {
    /// `None` keeps the current reference.
    pub main_string_id: Option<DbId>,
    pub cross_string_id: Option<DbId>,
    pub stringer_id: Option<DbId>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    pub due_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    /// `None` keeps the current price.
    pub price: Option<Decimal>,
}

pub struct StringJobRepo;

impl StringJobRepo {
    pub const TABLE: &'static str = "string_jobs";

    /// Insert a new job in `Pending`, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewStringJob) -> Result<StringJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO string_jobs (
                player_id, racquet_id, main_string_id, cross_string_id, stringer_id,
                tournament_id, main_tension, cross_tension, is_tension_in_kg, logo, status,
                notes, priority, due_date, price, created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringJob>(&query)
            .bind(input.player_id)
            .bind(input.racquet_id)
            .bind(input.main_string_id)
            .bind(input.cross_string_id)
            .bind(input.stringer_id)
            .bind(input.tournament_id)
            .bind(input.main_tension)
            .bind(input.cross_tension)
            .bind(input.is_tension_in_kg)
            .bind(&input.logo)
            .bind(JobStatus::Pending.as_str())
            .bind(&input.notes)
            .bind(input.priority)
            .bind(input.due_date)
            .bind(input.price)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StringJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM string_jobs WHERE id = $1");
        sqlx::query_as::<_, StringJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a job with all references resolved.
    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StringJobDetails>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} WHERE j.id = $1");
        let row = sqlx::query_as::<_, StringJobJoinedRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(StringJobJoinedRow::into_details))
    }

    /// List jobs matching `filter` in the default order.
    pub async fn list(
        pool: &PgPool,
        filter: &StringJobFilter,
    ) -> Result<Vec<StringJobDetails>, sqlx::Error> {
        let query = format!(
            "{JOINED_SELECT}
             WHERE ($1::TEXT IS NULL OR j.status = $1)
               AND ($2::BIGINT IS NULL OR j.tournament_id = $2)
               AND ($3::BIGINT IS NULL OR j.player_id = $3)
               AND ($4::BIGINT IS NULL OR j.stringer_id = $4)
               AND (NOT $5::BOOL OR (j.status = 'Completed' AND NOT j.is_paid))
             {DEFAULT_ORDER}"
        );
        let rows = sqlx::query_as::<_, StringJobJoinedRow>(&query)
            .bind(filter.status.map(JobStatus::as_str))
            .bind(filter.tournament_id)
            .bind(filter.player_id)
            .bind(filter.stringer_id)
            .bind(filter.unpaid_only)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(StringJobJoinedRow::into_details).collect())
    }

    /// Overwrite editable fields while the job is open and still at `version`.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        changes: &StringJobChanges,
    ) -> Result<Option<StringJob>, sqlx::Error> {
        let query = format!(
            "UPDATE string_jobs SET
                main_string_id = COALESCE($3, main_string_id),
                cross_string_id = COALESCE($4, cross_string_id),
                stringer_id = COALESCE($5, stringer_id),
                main_tension = $6,
                cross_tension = $7,
                is_tension_in_kg = $8,
                logo = $9,
                due_date = $10,
                notes = $11,
                priority = $12,
                price = COALESCE($13, price),
                version = version + 1
             WHERE id = $1 AND version = $2 AND status IN ('Pending', 'InProgress')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringJob>(&query)
            .bind(id)
            .bind(version)
            .bind(changes.main_string_id)
            .bind(changes.cross_string_id)
            .bind(changes.stringer_id)
            .bind(changes.main_tension)
            .bind(changes.cross_tension)
            .bind(changes.is_tension_in_kg)
            .bind(&changes.logo)
            .bind(changes.due_date)
            .bind(&changes.notes)
            .bind(changes.priority)
            .bind(changes.price)
            .fetch_optional(pool)
            .await
    }

    /// Move a job to `status`, writing `completed_at` and `notes` in the same statement.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        status: JobStatus,
        completed_at: Option<Timestamp>,
        notes: Option<&str>,
    ) -> Result<Option<StringJob>, sqlx::Error> {
        let query = format!(
            "UPDATE string_jobs SET
                status = $3,
                completed_at = $4,
                notes = $5,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringJob>(&query)
            .bind(id)
            .bind(version)
            .bind(status.as_str())
            .bind(completed_at)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_paid(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
    ) -> Result<Option<StringJob>, sqlx::Error> {
        let query = format!(
            "UPDATE string_jobs SET is_paid = TRUE, version = version + 1
             WHERE id = $1 AND version = $2 AND status = 'Completed'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringJob>(&query)
            .bind(id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// Delete a job that is still at `version`. Returns `true` if removed.
    pub async fn delete(pool: &PgPool, id: DbId, version: RowVersion) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM string_jobs WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(version)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
