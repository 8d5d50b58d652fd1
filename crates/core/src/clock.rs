//! Injected time source.
//!
//! Handlers never call `Utc::now()` directly; they ask the [`Clock`] held in
//! application state so tests can pin "now" and "today".

use chrono::{FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};

use crate::types::Timestamp;

/// Source of the current instant and the server's calendar offset.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> Timestamp;

    /// Offset used to decide which calendar day "now" falls on.
    fn offset(&self) -> FixedOffset;

    /// Calendar date of `now()` in the clock's offset.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset()).date_naive()
    }

    /// `[start, end)` bounds, in UTC, of the given calendar day in the clock's offset.
    fn day_bounds(&self, date: NaiveDate) -> (Timestamp, Timestamp) {
        let offset = self.offset();
        let start_local = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let start = offset
            .from_local_datetime(&start_local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&start_local));
        (start, start + chrono::Duration::days(1))
    }
}

/// Wall clock using the host's local offset for calendar-day decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// Clock pinned to a single instant. Calendar days are UTC unless overridden.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: Timestamp,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(now: Timestamp, offset: FixedOffset) -> Self {
        Self { now, offset }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}
