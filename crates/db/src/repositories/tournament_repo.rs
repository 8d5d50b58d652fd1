//! Repository for the `tournaments` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::tournament::{CreateTournament, Tournament, UpdateTournament};

const COLUMNS: &str = "id, name, start_date, end_date, location, category, version";

pub struct TournamentRepo;

impl TournamentRepo {
    pub const TABLE: &'static str = "tournaments";

    pub async fn create(pool: &PgPool, input: &CreateTournament) -> Result<Tournament, sqlx::Error> {
        let query = format!(
            "INSERT INTO tournaments (name, start_date, end_date, location, category)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments WHERE id = $1");
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tournaments, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tournament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tournaments ORDER BY start_date DESC, id DESC");
        sqlx::query_as::<_, Tournament>(&query).fetch_all(pool).await
    }

    /// The tournament running on `date` (inclusive bounds). Earliest start wins.
    pub async fn find_active_on(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tournaments
             WHERE start_date <= $1 AND end_date >= $1
             ORDER BY start_date ASC, id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        input: &UpdateTournament,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let query = format!(
            "UPDATE tournaments SET
                name = $3,
                start_date = $4,
                end_date = $5,
                location = $6,
                category = $7,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tournament>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        crate::versioned::row_exists(pool, Self::TABLE, id).await
    }

    pub async fn count_jobs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM string_jobs WHERE tournament_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
