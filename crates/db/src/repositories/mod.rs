//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Updates and deletes that must not
//! clobber a concurrent change take the expected `version` and return
//! `Option`/`bool`; callers feed the outcome to [`crate::versioned::resolve`].

pub mod dashboard_repo;
pub mod player_repo;
pub mod racquet_repo;
pub mod string_job_repo;
pub mod string_type_repo;
pub mod stringer_repo;
pub mod tournament_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use player_repo::PlayerRepo;
pub use racquet_repo::RacquetRepo;
pub use string_job_repo::StringJobRepo;
pub use string_type_repo::StringTypeRepo;
pub use stringer_repo::StringerRepo;
pub use tournament_repo::TournamentRepo;
pub use user_repo::UserRepo;
