use crate::types::DbId;

/// Domain-level failure kinds shared by every layer.
///
/// `Guard` covers mutations blocked by current state or dependent rows.
/// `Conflict` is reserved for optimistic-concurrency failures where the row
/// still exists but changed between read and write.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Operation not allowed: {0}")]
    Guard(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
