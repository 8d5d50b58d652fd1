//! Repository for the `players` table.

use sqlx::PgPool;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::player::{CreatePlayer, Player, UpdatePlayer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, last_name, country_code, version";

pub struct PlayerRepo;

impl PlayerRepo {
    pub const TABLE: &'static str = "players";

    /// Insert a new player, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlayer) -> Result<Player, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (name, last_name, country_code)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(&input.name)
            .bind(&input.last_name)
            .bind(&input.country_code)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all players ordered by last name, then first name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players ORDER BY last_name, name, id");
        sqlx::query_as::<_, Player>(&query).fetch_all(pool).await
    }

    /// Overwrite all mutable fields if the row is still at `version`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        input: &UpdatePlayer,
    ) -> Result<Option<Player>, sqlx::Error> {
        let query = format!(
            "UPDATE players SET
                name = $3,
                last_name = $4,
                country_code = $5,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.name)
            .bind(&input.last_name)
            .bind(&input.country_code)
            .fetch_optional(pool)
            .await
    }

    /// Delete a player. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        crate::versioned::row_exists(pool, Self::TABLE, id).await
    }

    /// Racquets owned by the player.
    pub async fn count_racquets(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM racquets WHERE player_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Jobs recorded for the player, in any status.
    pub async fn count_jobs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM string_jobs WHERE player_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
