//! Optimistic-concurrency outcome shared by every repository.
//!
//! Mutating statements run as `... WHERE id = $1 AND version = $2` and bump
//! `version`. When such a statement matches no row, the row either vanished
//! or was changed by someone else; [`resolve`] tells the two apart.

use sqlx::PgPool;
use stringdesk_core::error::CoreError;
use stringdesk_core::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Versioned<T> {
    /// The write matched the expected version.
    Applied(T),
    /// The row no longer exists.
    Missing,
    /// The row exists but its version moved on.
    Stale,
}

impl<T> Versioned<T> {
    /// Collapse into the domain error taxonomy.
    pub fn into_core(self, entity: &'static str, id: DbId) -> Result<T, CoreError> {
        match self {
            Versioned::Applied(value) => Ok(value),
            Versioned::Missing => Err(CoreError::NotFound { entity, id }),
            Versioned::Stale => Err(CoreError::Conflict(format!(
                "{entity} {id} was modified by another request; reload and retry"
            ))),
        }
    }
}

/// Classify the result of a version-checked write against `table`.
///
/// `table` must be a trusted identifier; it is interpolated into SQL.
pub async fn resolve<T>(
    pool: &PgPool,
    table: &'static str,
    id: DbId,
    outcome: Option<T>,
) -> Result<Versioned<T>, sqlx::Error> {
    match outcome {
        Some(value) => Ok(Versioned::Applied(value)),
        None if row_exists(pool, table, id).await? => {
            tracing::debug!(table, id, "Version-checked write lost a race");
            Ok(Versioned::Stale)
        }
        None => Ok(Versioned::Missing),
    }
}

/// Whether a row with `id` exists in `table`.
pub async fn row_exists(pool: &PgPool, table: &'static str, id: DbId) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}
