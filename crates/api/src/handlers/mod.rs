//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers check roles through the extractors in [`crate::middleware`],
//! apply the domain rules from `stringdesk_core`, delegate persistence to the
//! repositories in `stringdesk_db` and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod dashboard;
pub mod label;
pub mod player;
pub mod racquet;
pub mod string_job;
pub mod string_type;
pub mod stringer;
pub mod tournament;
pub mod users;
