//! Stringing job lifecycle rules.
//!
//! A job moves `Pending -> InProgress -> {Completed, Cancelled}`; `Pending`
//! may also jump straight to either terminal state. Terminal states never
//! change again, except that a completed job can be flagged as paid.
//!
//! Every guard here is a pure check over the current status. Persistence
//! applies the change afterwards in a single version-checked statement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    /// Name stored in the `string_jobs.status` column and sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::InProgress => "InProgress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    pub fn is_open(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid job status '{s}'. Must be one of: Pending, InProgress, Completed, Cancelled"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Transition guards
// ---------------------------------------------------------------------------

/// `Pending -> InProgress`.
pub fn check_start(current: JobStatus) -> Result<JobStatus, CoreError> {
    match current {
        JobStatus::Pending => Ok(JobStatus::InProgress),
        other => Err(CoreError::Guard(format!(
            "Cannot start job in current state ({other}); only pending jobs can be started"
        ))),
    }
}

/// `Pending | InProgress -> Completed`.
pub fn check_complete(current: JobStatus) -> Result<JobStatus, CoreError> {
    match current {
        JobStatus::Pending | JobStatus::InProgress => Ok(JobStatus::Completed),
        JobStatus::Completed => Err(CoreError::Guard("Job is already completed".into())),
        JobStatus::Cancelled => Err(CoreError::Guard(
            "Cannot complete a cancelled job".into(),
        )),
    }
}

/// `Pending | InProgress -> Cancelled`.
pub fn check_cancel(current: JobStatus) -> Result<JobStatus, CoreError> {
    match current {
        JobStatus::Pending | JobStatus::InProgress => Ok(JobStatus::Cancelled),
        JobStatus::Completed => Err(CoreError::Guard("Cannot cancel a completed job".into())),
        JobStatus::Cancelled => Err(CoreError::Guard("Job is already cancelled".into())),
    }
}

/// Payment can only be recorded once the work is done.
pub fn check_mark_paid(current: JobStatus) -> Result<(), CoreError> {
    if current == JobStatus::Completed {
        Ok(())
    } else {
        Err(CoreError::Guard(format!(
            "Only completed jobs can be marked as paid (job is {current})"
        )))
    }
}

/// Only jobs nobody has touched yet may be removed.
pub fn check_delete(current: JobStatus) -> Result<(), CoreError> {
    if current == JobStatus::Pending {
        Ok(())
    } else {
        Err(CoreError::Guard(format!(
            "Only pending jobs can be deleted (job is {current})"
        )))
    }
}

/// Field edits are limited to open jobs.
pub fn check_update(current: JobStatus) -> Result<(), CoreError> {
    if current.is_open() {
        Ok(())
    } else {
        Err(CoreError::Guard(format!(
            "Cannot update a {} job",
            current.as_str().to_lowercase()
        )))
    }
}

/// A general update may echo the current status but never change it.
pub fn check_update_status(current: JobStatus, requested: Option<&str>) -> Result<(), CoreError> {
    let Some(requested) = requested else {
        return Ok(());
    };
    let requested: JobStatus = requested.parse()?;
    if requested == current {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Status cannot be changed from {current} to {requested} via update; \
             use the start, complete or cancel operations"
        )))
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

pub const PRIORITY_HIGH: i32 = 1;
pub const PRIORITY_LOW: i32 = 3;

pub fn validate_priority(priority: Option<i32>) -> Result<(), CoreError> {
    match priority {
        Some(p) if !(PRIORITY_HIGH..=PRIORITY_LOW).contains(&p) => Err(CoreError::Validation(
            format!("Priority must be between {PRIORITY_HIGH} (high) and {PRIORITY_LOW} (low), got {p}"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_tensions(main: f64, cross: Option<f64>) -> Result<(), CoreError> {
    if !main.is_finite() || main <= 0.0 {
        return Err(CoreError::Validation(
            "Main tension must be a positive number".into(),
        ));
    }
    if let Some(cross) = cross {
        if !cross.is_finite() || cross <= 0.0 {
            return Err(CoreError::Validation(
                "Cross tension must be a positive number".into(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

const NOTE_SEPARATOR: &str = "\n\n";

/// Append `entry` to existing notes, separated by a blank line.
pub fn append_note(existing: Option<&str>, entry: &str) -> String {
    match existing {
        Some(existing) if !existing.is_empty() => format!("{existing}{NOTE_SEPARATOR}{entry}"),
        _ => entry.to_string(),
    }
}

/// Notes after completion. Blank completion notes leave the notes untouched.
pub fn completion_notes(existing: Option<&str>, notes: Option<&str>) -> Option<String> {
    match notes.filter(|n| !n.trim().is_empty()) {
        None => existing.map(str::to_string),
        Some(notes) => match existing {
            Some(existing) if !existing.is_empty() => Some(append_note(
                Some(existing),
                &format!("Completion notes: {notes}"),
            )),
            _ => Some(notes.to_string()),
        },
    }
}

/// Notes after cancellation. Blank reasons leave the notes untouched.
pub fn cancellation_notes(existing: Option<&str>, reason: Option<&str>) -> Option<String> {
    match reason.filter(|r| !r.trim().is_empty()) {
        None => existing.map(str::to_string),
        Some(reason) => Some(append_note(existing, &format!("Cancelled: {reason}"))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_names_round_trip_through_from_str() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_matches!("Done".parse::<JobStatus>(), Err(CoreError::Validation(_)));
        assert_matches!("pending".parse::<JobStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_pending_jobs_start() {
        assert_eq!(check_start(JobStatus::Pending).unwrap(), JobStatus::InProgress);
        for status in [JobStatus::InProgress, JobStatus::Completed, JobStatus::Cancelled] {
            assert_matches!(check_start(status), Err(CoreError::Guard(_)));
        }
    }

    #[test]
    fn open_jobs_complete_and_cancel() {
        for status in [JobStatus::Pending, JobStatus::InProgress] {
            assert_eq!(check_complete(status).unwrap(), JobStatus::Completed);
            assert_eq!(check_cancel(status).unwrap(), JobStatus::Cancelled);
        }
    }

    #[test]
    fn terminal_jobs_report_distinct_reasons() {
        let already = check_complete(JobStatus::Completed).unwrap_err().to_string();
        let cancelled = check_complete(JobStatus::Cancelled).unwrap_err().to_string();
        assert!(already.contains("already completed"));
        assert!(cancelled.contains("cancelled"));
        assert_ne!(already, cancelled);

        assert_matches!(check_cancel(JobStatus::Completed), Err(CoreError::Guard(_)));
        assert_matches!(check_cancel(JobStatus::Cancelled), Err(CoreError::Guard(_)));
    }

    #[test]
    fn payment_requires_completion() {
        assert!(check_mark_paid(JobStatus::Completed).is_ok());
        for status in [JobStatus::Pending, JobStatus::InProgress, JobStatus::Cancelled] {
            assert_matches!(check_mark_paid(status), Err(CoreError::Guard(_)));
        }
    }

    #[test]
    fn delete_only_while_pending() {
        assert!(check_delete(JobStatus::Pending).is_ok());
        for status in [JobStatus::InProgress, JobStatus::Completed, JobStatus::Cancelled] {
            assert_matches!(check_delete(status), Err(CoreError::Guard(_)));
        }
    }

    #[test]
    fn update_rejected_for_terminal_jobs() {
        assert!(check_update(JobStatus::Pending).is_ok());
        assert!(check_update(JobStatus::InProgress).is_ok());
        assert_matches!(check_update(JobStatus::Completed), Err(CoreError::Guard(_)));
        assert_matches!(check_update(JobStatus::Cancelled), Err(CoreError::Guard(_)));
    }

    #[test]
    fn update_cannot_bypass_transitions() {
        assert!(check_update_status(JobStatus::Pending, None).is_ok());
        assert!(check_update_status(JobStatus::Pending, Some("Pending")).is_ok());
        assert_matches!(
            check_update_status(JobStatus::Pending, Some("Completed")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            check_update_status(JobStatus::InProgress, Some("bogus")),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn priority_range_is_one_to_three() {
        assert!(validate_priority(None).is_ok());
        assert!(validate_priority(Some(1)).is_ok());
        assert!(validate_priority(Some(3)).is_ok());
        assert!(validate_priority(Some(0)).is_err());
        assert!(validate_priority(Some(4)).is_err());
    }

    #[test]
    fn tensions_must_be_positive() {
        assert!(validate_tensions(24.0, None).is_ok());
        assert!(validate_tensions(24.0, Some(23.0)).is_ok());
        assert!(validate_tensions(0.0, None).is_err());
        assert!(validate_tensions(24.0, Some(-1.0)).is_err());
        assert!(validate_tensions(f64::NAN, None).is_err());
    }

    #[test]
    fn completion_notes_append_with_separator() {
        assert_eq!(
            completion_notes(Some("existing"), Some("new")).unwrap(),
            "existing\n\nCompletion notes: new"
        );
        assert_eq!(completion_notes(None, Some("done early")).unwrap(), "done early");
        assert_eq!(completion_notes(Some(""), Some("done")).unwrap(), "done");
        assert_eq!(completion_notes(Some("keep"), None).unwrap(), "keep");
        assert_eq!(completion_notes(Some("keep"), Some("  ")).unwrap(), "keep");
        assert!(completion_notes(None, None).is_none());
    }

    #[test]
    fn cancellation_reason_is_prefixed() {
        assert_eq!(
            cancellation_notes(Some("existing"), Some("player withdrew")).unwrap(),
            "existing\n\nCancelled: player withdrew"
        );
        assert_eq!(
            cancellation_notes(None, Some("player withdrew")).unwrap(),
            "Cancelled: player withdrew"
        );
        assert!(cancellation_notes(None, None).is_none());
    }
}
