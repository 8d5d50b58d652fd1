//! Domain rules for the stringing shop: job lifecycle, tension handling,
//! tournament dates, label projection and the injected clock.
//!
//! Nothing in this crate touches the database or HTTP.

pub mod clock;
pub mod datetime;
pub mod error;
pub mod label;
pub mod roles;
pub mod string_job;
pub mod tension;
pub mod tournament;
pub mod types;
pub mod validation;
