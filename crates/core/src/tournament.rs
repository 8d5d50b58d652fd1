//! Tournament date rules.

use chrono::NaiveDate;

use crate::error::CoreError;

pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "End date ({end}) must not be before start date ({start})"
        )));
    }
    Ok(())
}

/// Whole days left until the last tournament day. Zero on the final day.
pub fn remaining_days(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days().max(0)
}
