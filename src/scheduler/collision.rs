//! Overlap detection and task-boundary resolution.
//!
//! All ranges are half-open `[start, end)` over whole days. Two ranges that
//! merely touch (`a.end == b.start`) do not collide.

use chrono::NaiveDate;

use crate::error::SchedulerError;
use crate::model::period::checked_shift;
use crate::model::{PeriodId, Task, ToDay};

/// What a candidate range runs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collision {
    /// The task's own bar.
    Task,
    /// Another period on the same task.
    Period(PeriodId),
}

/// Outcome of fitting a candidate range around the task bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// True when the range differs from the request.
    pub adjusted: bool,
}

/// Half-open overlap test.
#[inline]
pub fn overlaps(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start < b_end && a_end > b_start
}

/// First thing the range collides with: the task bar, then periods in
/// insertion order. `exclude` skips one period (the one being moved).
pub fn find_collision(
    task: &Task,
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<&PeriodId>,
) -> Option<Collision> {
    if overlaps(start, end, task.start, task.end) {
        return Some(Collision::Task);
    }
    find_period_collision(task, start, end, exclude).map(Collision::Period)
}

/// First period (other than `exclude`) overlapping the range.
pub fn find_period_collision(
    task: &Task,
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<&PeriodId>,
) -> Option<PeriodId> {
    task.periods
        .iter()
        .filter(|p| Some(&p.id) != exclude)
        .find(|p| overlaps(start, end, p.start, p.end))
        .map(|p| p.id.clone())
}

/// Does the candidate overlap the task bar or any other period?
///
/// Both bounds are reduced to days first. Pure.
pub fn propose_overlap_check<D: ToDay>(
    task: &Task,
    start: &D,
    end: &D,
    exclude: Option<&PeriodId>,
) -> bool {
    find_collision(task, start.to_day(), end.to_day(), exclude).is_some()
}

/// Shrink a candidate so it abuts the task bar instead of overlapping it.
///
/// Only the task bar is considered here; period collisions are left for the
/// caller to reject. A candidate lying wholly inside the bar has no side to
/// keep and fails with `TaskConflict`. A widened window that would run off
/// the calendar fails with `Validation`.
pub fn resolve_collision(
    task: &Task,
    start: NaiveDate,
    end: NaiveDate,
    min_days: i64,
) -> Result<Resolution, SchedulerError> {
    let (task_start, task_end) = (task.start, task.end);
    if !overlaps(start, end, task_start, task_end) {
        return Ok(Resolution {
            start,
            end,
            adjusted: false,
        });
    }

    let keep_before = if start < task_start && end > task_end {
        // Candidate swallows the bar: keep the longer side, ties go before.
        (task_start - start) >= (end - task_end)
    } else if start < task_start {
        true
    } else if end > task_end {
        false
    } else {
        return Err(SchedulerError::TaskConflict);
    };

    let min_days = min_days.max(1);
    let (new_start, new_end) = if keep_before {
        if (task_start - start).num_days() < min_days {
            (checked_shift(task_start, -min_days)?, task_start)
        } else {
            (start, task_start)
        }
    } else if (end - task_end).num_days() < min_days {
        (task_end, checked_shift(task_end, min_days)?)
    } else {
        (task_end, end)
    };

    Ok(Resolution {
        start: new_start,
        end: new_end,
        adjusted: (new_start, new_end) != (start, end),
    })
}
