//! Aggregate queries behind the dashboard. Read-only.

use sqlx::PgPool;
use stringdesk_core::string_job::JobStatus;
use stringdesk_core::types::{DbId, Timestamp};

use crate::models::dashboard::{BrandCount, RankedEntity, StatusCount};

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn count_with_status(pool: &PgPool, status: JobStatus) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM string_jobs WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Jobs completed within `[start, end)`.
    pub async fn count_completed_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM string_jobs
             WHERE status = 'Completed' AND completed_at >= $1 AND completed_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    /// Open jobs at the given priority.
    pub async fn count_open_with_priority(pool: &PgPool, priority: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM string_jobs
             WHERE status IN ('Pending', 'InProgress') AND priority = $1",
        )
        .bind(priority)
        .fetch_one(pool)
        .await
    }

    /// Stringers ranked by completed jobs.
    pub async fn top_stringers(pool: &PgPool, limit: i64) -> Result<Vec<RankedEntity>, sqlx::Error> {
        sqlx::query_as::<_, RankedEntity>(
            "SELECT s.id, s.name || ' ' || s.last_name AS name, COUNT(*) AS job_count
             FROM string_jobs j
             JOIN stringers s ON s.id = j.stringer_id
             WHERE j.status = 'Completed'
             GROUP BY s.id, s.name, s.last_name
             ORDER BY job_count DESC, s.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Players ranked by jobs in any status.
    pub async fn top_players(pool: &PgPool, limit: i64) -> Result<Vec<RankedEntity>, sqlx::Error> {
        sqlx::query_as::<_, RankedEntity>(
            "SELECT p.id, p.name || ' ' || p.last_name AS name, COUNT(*) AS job_count
             FROM string_jobs j
             JOIN players p ON p.id = j.player_id
             GROUP BY p.id, p.name, p.last_name
             ORDER BY job_count DESC, p.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Strings ranked by use as the main string.
    pub async fn top_strings(pool: &PgPool, limit: i64) -> Result<Vec<RankedEntity>, sqlx::Error> {
        sqlx::query_as::<_, RankedEntity>(
            "SELECT st.id, st.brand || ' ' || st.model AS name, COUNT(*) AS job_count
             FROM string_jobs j
             JOIN string_types st ON st.id = j.main_string_id
             GROUP BY st.id, st.brand, st.model
             ORDER BY job_count DESC, st.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn status_distribution(
        pool: &PgPool,
        tournament_id: Option<DbId>,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count
             FROM string_jobs
             WHERE ($1::BIGINT IS NULL OR tournament_id = $1)
             GROUP BY status
             ORDER BY status",
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await
    }

    /// Main tensions of kilogram jobs; bucketing happens in the domain layer.
    pub async fn kg_main_tensions(
        pool: &PgPool,
        tournament_id: Option<DbId>,
    ) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT main_tension FROM string_jobs
             WHERE is_tension_in_kg AND ($1::BIGINT IS NULL OR tournament_id = $1)",
        )
        .bind(tournament_id)
        .fetch_all(pool)
        .await
    }

    /// Main string brands ranked by use.
    pub async fn string_brand_distribution(
        pool: &PgPool,
        tournament_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<BrandCount>, sqlx::Error> {
        sqlx::query_as::<_, BrandCount>(
            "SELECT st.brand, COUNT(*) AS count
             FROM string_jobs j
             JOIN string_types st ON st.id = j.main_string_id
             WHERE ($1::BIGINT IS NULL OR j.tournament_id = $1)
             GROUP BY st.brand
             ORDER BY count DESC, st.brand ASC
             LIMIT $2",
        )
        .bind(tournament_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
