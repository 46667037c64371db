use chrono::NaiveDate;

use crate::model::period::shift_days;

/// The visible window of the timeline and its pixel scale.
///
/// This is the host's position→date conversion; drags are expressed in
/// pixels and turned into whole days here.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineViewport {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    pub pixels_per_day: f32,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: end.max(start),
            pixels_per_day: 18.0,
        }
    }

    /// Date under an x offset from the viewport start, snapped to the
    /// nearest day. Offsets beyond the calendar pin to its first or last day.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = self.days_for(x);
        shift_days(self.start, days).unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    /// Whole days covered by a horizontal pointer movement.
    pub fn days_for(&self, delta_x: f32) -> i64 {
        (delta_x / self.pixels_per_day).round() as i64
    }
}
