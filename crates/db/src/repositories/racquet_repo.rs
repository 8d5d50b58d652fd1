//! Repository for the `racquets` table.

use sqlx::PgPool;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::racquet::{
    CreateRacquet, Racquet, RacquetJoinedRow, RacquetWithPlayer, UpdateRacquet,
};

const COLUMNS: &str = "id, player_id, brand, model, serial_number, head_size, notes, version";

const JOINED_SELECT: &str = "SELECT
        r.id, r.player_id, r.brand, r.model, r.serial_number, r.head_size, r.notes, r.version,
        p.name AS p_name, p.last_name AS p_last_name, p.country_code AS p_country_code,
        p.version AS p_version
     FROM racquets r
     LEFT JOIN players p ON p.id = r.player_id";

pub struct RacquetRepo;

impl RacquetRepo {
    pub const TABLE: &'static str = "racquets";

    pub async fn create(pool: &PgPool, input: &CreateRacquet) -> Result<Racquet, sqlx::Error> {
        let query = format!(
            "INSERT INTO racquets (player_id, brand, model, serial_number, head_size, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Racquet>(&query)
            .bind(input.player_id)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(input.head_size)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Racquet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM racquets WHERE id = $1");
        sqlx::query_as::<_, Racquet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List racquets with their owners, optionally restricted to one owner.
    pub async fn list(
        pool: &PgPool,
        player_id: Option<DbId>,
    ) -> Result<Vec<RacquetWithPlayer>, sqlx::Error> {
        let query = format!(
            "{JOINED_SELECT}
             WHERE ($1::BIGINT IS NULL OR r.player_id = $1)
             ORDER BY r.brand, r.model, r.id"
        );
        let rows = sqlx::query_as::<_, RacquetJoinedRow>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(RacquetJoinedRow::into_with_player).collect())
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        input: &UpdateRacquet,
    ) -> Result<Option<Racquet>, sqlx::Error> {
        let query = format!(
            "UPDATE racquets SET
                brand = $3,
                model = $4,
                serial_number = $5,
                head_size = $6,
                notes = $7,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Racquet>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.serial_number)
            .bind(input.head_size)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM racquets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_jobs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM string_jobs WHERE racquet_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
