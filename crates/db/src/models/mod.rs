//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs (catalog updates are full overwrites)

pub mod dashboard;
pub mod player;
pub mod racquet;
pub mod string_job;
pub mod string_type;
pub mod stringer;
pub mod tournament;
pub mod user;
