//! Repository for the `string_types` table.

use sqlx::PgPool;
use stringdesk_core::types::{DbId, RowVersion};

use crate::models::string_type::{CreateStringType, StringType, UpdateStringType};

const COLUMNS: &str = "id, brand, model, gauge, material, color, version";

pub struct StringTypeRepo;

impl StringTypeRepo {
    pub const TABLE: &'static str = "string_types";

    pub async fn create(pool: &PgPool, input: &CreateStringType) -> Result<StringType, sqlx::Error> {
        let query = format!(
            "INSERT INTO string_types (brand, model, gauge, material, color)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringType>(&query)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.gauge)
            .bind(&input.material)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StringType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM string_types WHERE id = $1");
        sqlx::query_as::<_, StringType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<StringType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM string_types ORDER BY brand, model, id");
        sqlx::query_as::<_, StringType>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: RowVersion,
        input: &UpdateStringType,
    ) -> Result<Option<StringType>, sqlx::Error> {
        let query = format!(
            "UPDATE string_types SET
                brand = $3,
                model = $4,
                gauge = $5,
                material = $6,
                color = $7,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StringType>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(&input.gauge)
            .bind(&input.material)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM string_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        crate::versioned::row_exists(pool, Self::TABLE, id).await
    }

    /// Jobs using this string on either axis.
    pub async fn count_jobs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM string_jobs WHERE main_string_id = $1 OR cross_string_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
