//! Repository for the `stringers` table.

use sqlx::PgPool;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::stringer::{CreateStringer, Stringer, UpdateStringer};

const COLUMNS: &str = "id, name, last_name, email, phone_number, version";

pub struct StringerRepo;

impl StringerRepo {
    pub const TABLE: &'static str = "stringers";

    pub async fn create(pool: &PgPool, input: &CreateStringer) -> Result<Stringer, sqlx::Error> {
        let query = format!(
            "INSERT INTO stringers (name, last_name, email, phone_number)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stringer>(&query)
            .bind(&input.name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stringer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stringers WHERE id = $1");
        sqlx::query_as::<_, Stringer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Stringer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stringers ORDER BY last_name, name, id");
        sqlx::query_as::<_, Stringer>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        input: &UpdateStringer,
    ) -> Result<Option<Stringer>, sqlx::Error> {
        let query = format!(
            "UPDATE stringers SET
                name = $3,
                last_name = $4,
                email = $5,
                phone_number = $6,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stringer>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stringers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        crate::versioned::row_exists(pool, Self::TABLE, id).await
    }

    pub async fn count_jobs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM string_jobs WHERE stringer_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
