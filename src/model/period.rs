use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::SchedulerError;

/// Identifier of a period, unique within its parent task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(String);

impl PeriodId {
    /// Build a fresh id from the current timestamp plus a random suffix,
    /// e.g. `period_1710028800000_3f2a9c1be`.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "period_{}_{}",
            Utc::now().timestamp_millis(),
            &suffix[..9]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeriodId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeriodId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An auxiliary sub-interval attached to a task (e.g. a trial run).
///
/// Bounds are whole days; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Display color, passed through untouched (e.g. `#FF69B4`).
    pub color: String,
}

impl Period {
    pub fn new(
        id: PeriodId,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
            color: color.into(),
        }
    }

    /// Length in whole days.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Anything that can be reduced to a calendar day. Time-of-day is dropped.
pub trait ToDay {
    fn to_day(&self) -> NaiveDate;
}

impl ToDay for NaiveDate {
    fn to_day(&self) -> NaiveDate {
        *self
    }
}

impl ToDay for NaiveDateTime {
    fn to_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> ToDay for DateTime<Tz> {
    fn to_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Move a date by a signed number of days. `None` past the calendar's range.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Like `shift_days`, but running off the calendar is a validation error.
pub fn checked_shift(date: NaiveDate, days: i64) -> Result<NaiveDate, SchedulerError> {
    shift_days(date, days).ok_or_else(|| {
        SchedulerError::Validation(format!("{} shifted by {} days is out of range", date, days))
    })
}

/// Normalize a pair of bounds: strip time, swap reversed bounds and widen
/// anything shorter than `min_days`.
pub fn normalize_range<D: ToDay>(
    start: &D,
    end: &D,
    min_days: i64,
) -> Result<(NaiveDate, NaiveDate), SchedulerError> {
    let (mut start, mut end) = (start.to_day(), end.to_day());
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    let min_days = min_days.max(1);
    if (end - start).num_days() < min_days {
        end = checked_shift(start, min_days)?;
    }
    Ok((start, end))
}
