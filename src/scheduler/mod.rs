//! Placement of trial-run periods around a task bar.
//!
//! Collisions with the task's own bar are resolved by shrinking the request
//! so it abuts the bar. Collisions with another period are rejected and leave
//! the task untouched.

pub mod collision;
pub mod drag;

use chrono::NaiveDate;
use log::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::model::period::normalize_range;
use crate::model::{Period, PeriodId, Task, ToDay};

pub use collision::{Collision, Resolution};
pub use drag::{DragCommit, DragKind, DragSession, DragState, ResizeEdge};

/// A committed placement, reported back so the UI can tell the user when the
/// request was trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodChange {
    pub period_id: PeriodId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub adjusted: bool,
}

/// Validates and applies period mutations on a single task.
#[derive(Debug, Clone, Default)]
pub struct PeriodScheduler {
    config: SchedulerConfig,
}

impl PeriodScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// True when `[start, end)` overlaps the task bar or another period.
    pub fn propose_overlap_check<D: ToDay>(
        &self,
        task: &Task,
        start: &D,
        end: &D,
        exclude: Option<&PeriodId>,
    ) -> bool {
        collision::propose_overlap_check(task, start, end, exclude)
    }

    /// Fit the candidate around the task bar. Period collisions are not
    /// considered here.
    ///
    /// The bounds are normalized first (days only, reversed bounds swapped,
    /// widened to the minimum length). `adjusted` compares the result with
    /// that normalized range, not with the raw arguments, so a zero-length or
    /// reversed request that needed no trimming reports `adjusted: false`
    /// even though the returned range differs from what was passed in.
    pub fn resolve_collision<D: ToDay>(
        &self,
        task: &Task,
        start: &D,
        end: &D,
    ) -> Result<Resolution, SchedulerError> {
        check_task(task)?;
        let (start, end) = normalize_range(start, end, self.config.min_days())?;
        collision::resolve_collision(task, start, end, self.config.min_days())
    }

    /// Add a new period with the configured default name and color.
    pub fn add_period<D: ToDay>(
        &self,
        task: &mut Task,
        start: D,
        end: D,
    ) -> Result<PeriodChange, SchedulerError> {
        let placed = self.place(task, &start, &end, None)?;

        let mut id = PeriodId::generate();
        while task.period(&id).is_some() {
            id = PeriodId::generate();
        }
        task.periods.push(Period::new(
            id.clone(),
            self.config.period_name.clone(),
            placed.start,
            placed.end,
            self.config.period_color.clone(),
        ));

        debug!("task {}: added period {} [{}, {})", task.id, id, placed.start, placed.end);
        Ok(PeriodChange {
            period_id: id,
            start: placed.start,
            end: placed.end,
            adjusted: placed.adjusted,
        })
    }

    /// Move an existing period. Name, color and id are kept.
    pub fn move_period<D: ToDay>(
        &self,
        task: &mut Task,
        period_id: &PeriodId,
        start: D,
        end: D,
    ) -> Result<PeriodChange, SchedulerError> {
        self.reposition(task, period_id, &start, &end)
    }

    /// Change one or both edges of an existing period.
    pub fn resize_period<D: ToDay>(
        &self,
        task: &mut Task,
        period_id: &PeriodId,
        start: D,
        end: D,
    ) -> Result<PeriodChange, SchedulerError> {
        self.reposition(task, period_id, &start, &end)
    }

    /// Remove a period. Unknown ids are a no-op and return `None`.
    pub fn delete_period(&self, task: &mut Task, period_id: &PeriodId) -> Option<Period> {
        let index = task.periods.iter().position(|p| &p.id == period_id)?;
        let removed = task.periods.remove(index);
        debug!("task {}: deleted period {}", task.id, period_id);
        Some(removed)
    }

    fn reposition<D: ToDay>(
        &self,
        task: &mut Task,
        period_id: &PeriodId,
        start: &D,
        end: &D,
    ) -> Result<PeriodChange, SchedulerError> {
        if task.period(period_id).is_none() {
            return Err(SchedulerError::PeriodNotFound(period_id.clone()));
        }
        let placed = self.place(task, start, end, Some(period_id))?;

        let period = task
            .period_mut(period_id)
            .ok_or_else(|| SchedulerError::PeriodNotFound(period_id.clone()))?;
        period.start = placed.start;
        period.end = placed.end;

        debug!(
            "task {}: moved period {} to [{}, {})",
            task.id, period_id, placed.start, placed.end
        );
        Ok(PeriodChange {
            period_id: period_id.clone(),
            start: placed.start,
            end: placed.end,
            adjusted: placed.adjusted,
        })
    }

    /// Normalize, resolve against the task bar, then reject any remaining
    /// period overlap. Never mutates.
    fn place<D: ToDay>(
        &self,
        task: &Task,
        start: &D,
        end: &D,
        exclude: Option<&PeriodId>,
    ) -> Result<Resolution, SchedulerError> {
        let resolution = self.resolve_collision(task, start, end)?;
        if let Some(period_id) =
            collision::find_period_collision(task, resolution.start, resolution.end, exclude)
        {
            return Err(SchedulerError::Conflict { period_id });
        }
        if resolution.adjusted {
            info!(
                "task {}: request trimmed to [{}, {}) to clear the task bar",
                task.id, resolution.start, resolution.end
            );
        }
        Ok(resolution)
    }
}

fn check_task(task: &Task) -> Result<(), SchedulerError> {
    if task.end < task.start {
        return Err(SchedulerError::Validation(format!(
            "task {} ends ({}) before it starts ({})",
            task.id, task.end, task.start
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use pretty_assertions::assert_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn task() -> Task {
        Task::new(TaskId(1), "ORD-1", d(3, 10), d(3, 20))
    }

    fn scheduler() -> PeriodScheduler {
        PeriodScheduler::default()
    }

    fn assert_no_overlaps(task: &Task) {
        for (i, p) in task.periods.iter().enumerate() {
            assert!(p.end > p.start, "period {} is empty", p.id);
            assert!(!collision::overlaps(p.start, p.end, task.start, task.end));
            for q in &task.periods[i + 1..] {
                assert!(!collision::overlaps(p.start, p.end, q.start, q.end));
            }
        }
    }

    #[test]
    fn add_before_task_is_trimmed() {
        let mut t = task();
        let change = scheduler().add_period(&mut t, d(3, 5), d(3, 15)).unwrap();
        assert_eq!((change.start, change.end, change.adjusted), (d(3, 5), d(3, 10), true));
        assert_eq!(t.periods.len(), 1);
        assert_eq!(t.periods[0].name, "Trial run");
        assert_eq!(t.periods[0].color, "#FF69B4");
    }

    #[test]
    fn add_spanning_task_keeps_longer_side() {
        let mut t = task();
        let change = scheduler().add_period(&mut t, d(3, 1), d(3, 25)).unwrap();
        assert_eq!((change.start, change.end, change.adjusted), (d(3, 1), d(3, 10), true));
    }

    #[test]
    fn add_over_existing_period_is_rejected() {
        let mut t = task();
        let s = scheduler();
        let first = s.add_period(&mut t, d(4, 1), d(4, 5)).unwrap();
        let err = s.add_period(&mut t, d(4, 3), d(4, 6)).unwrap_err();
        assert_eq!(err, SchedulerError::Conflict { period_id: first.period_id });
        assert!(err.is_conflict());
        assert_eq!(t.periods.len(), 1);
    }

    #[test]
    fn add_zero_length_is_widened() {
        let mut t = task();
        let change = scheduler().add_period(&mut t, d(5, 1), d(5, 1)).unwrap();
        assert_eq!((change.start, change.end, change.adjusted), (d(5, 1), d(5, 2), false));
    }

    #[test]
    fn add_reversed_bounds_are_swapped() {
        let mut t = task();
        let change = scheduler().add_period(&mut t, d(5, 4), d(5, 1)).unwrap();
        assert_eq!((change.start, change.end), (d(5, 1), d(5, 4)));
    }

    #[test]
    fn add_inside_task_is_rejected() {
        let mut t = task();
        let err = scheduler().add_period(&mut t, d(3, 12), d(3, 14)).unwrap_err();
        assert_eq!(err, SchedulerError::TaskConflict);
        assert!(t.periods.is_empty());
    }

    #[test]
    fn trimmed_range_that_hits_a_period_is_rejected() {
        let mut t = task();
        let s = scheduler();
        s.add_period(&mut t, d(3, 1), d(3, 4)).unwrap();
        let err = s.add_period(&mut t, d(3, 2), d(3, 15)).unwrap_err();
        assert!(matches!(err, SchedulerError::Conflict { .. }));
        assert_eq!(t.periods.len(), 1);
    }

    #[test]
    fn move_within_own_footprint_succeeds() {
        let mut t = task();
        let s = scheduler();
        let p1 = s.add_period(&mut t, d(4, 1), d(4, 5)).unwrap().period_id;

        let change = s.move_period(&mut t, &p1, d(4, 2), d(4, 4)).unwrap();
        assert!(!change.adjusted);
        let period = t.period(&p1).unwrap();
        assert_eq!((period.start, period.end), (d(4, 2), d(4, 4)));
        assert_eq!(period.name, "Trial run");
    }

    #[test]
    fn failed_move_leaves_period_in_place() {
        let mut t = task();
        let s = scheduler();
        let p1 = s.add_period(&mut t, d(4, 1), d(4, 5)).unwrap().period_id;
        s.add_period(&mut t, d(4, 10), d(4, 12)).unwrap();

        let err = s.move_period(&mut t, &p1, d(4, 9), d(4, 13)).unwrap_err();
        assert!(matches!(err, SchedulerError::Conflict { .. }));
        let period = t.period(&p1).unwrap();
        assert_eq!((period.start, period.end), (d(4, 1), d(4, 5)));
    }

    #[test]
    fn resize_into_task_bar_is_trimmed() {
        let mut t = task();
        let s = scheduler();
        let p1 = s.add_period(&mut t, d(3, 1), d(3, 5)).unwrap().period_id;

        let change = s.resize_period(&mut t, &p1, d(3, 1), d(3, 14)).unwrap();
        assert_eq!((change.start, change.end, change.adjusted), (d(3, 1), d(3, 10), true));
    }

    #[test]
    fn unknown_period_is_not_found() {
        let mut t = task();
        let missing = PeriodId::from("nope");
        let err = scheduler().move_period(&mut t, &missing, d(4, 1), d(4, 2)).unwrap_err();
        assert_eq!(err, SchedulerError::PeriodNotFound(missing));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut t = task();
        let s = scheduler();
        let p1 = s.add_period(&mut t, d(4, 1), d(4, 5)).unwrap().period_id;
        assert!(s.delete_period(&mut t, &p1).is_some());
        assert!(s.delete_period(&mut t, &p1).is_none());
        assert!(t.periods.is_empty());
    }

    #[test]
    fn inverted_task_is_a_validation_error() {
        let mut t = task();
        t.end = d(3, 1);
        let err = scheduler().add_period(&mut t, d(4, 1), d(4, 2)).unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
    }

    #[test]
    fn configured_minimum_applies() {
        let s = PeriodScheduler::new(SchedulerConfig {
            min_period_days: 3,
            ..Default::default()
        });
        let mut t = task();
        let change = s.add_period(&mut t, d(3, 9), d(3, 12)).unwrap();
        assert_eq!((change.start, change.end), (d(3, 7), d(3, 10)));
    }

    #[test]
    fn edits_at_the_calendar_edge_fail_cleanly() {
        let s = scheduler();
        let mut t = task();
        let err = s.add_period(&mut t, NaiveDate::MAX, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
        assert!(t.periods.is_empty());

        let p1 = s.add_period(&mut t, d(4, 1), d(4, 5)).unwrap().period_id;
        let err = s.move_period(&mut t, &p1, NaiveDate::MAX, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
        let err = s.resize_period(&mut t, &p1, NaiveDate::MAX, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, SchedulerError::Validation(_)));
        let period = t.period(&p1).unwrap();
        assert_eq!((period.start, period.end), (d(4, 1), d(4, 5)));
    }

    #[test]
    fn oversized_minimum_from_settings_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"min_period_days": 9223372036854775807}"#).unwrap();
        let s = PeriodScheduler::new(SchedulerConfig::load_from(&path));

        let mut t = task();
        let change = s.add_period(&mut t, d(4, 1), d(4, 2)).unwrap();
        assert_eq!(change.start, d(4, 1));
        assert_eq!(
            (change.end - change.start).num_days(),
            crate::config::MAX_PERIOD_DAYS
        );
    }

    #[test]
    fn sequences_of_edits_keep_periods_apart() {
        let s = scheduler();
        let mut t = task();
        let requests = [
            (d(3, 1), d(3, 30)),
            (d(3, 18), d(3, 25)),
            (d(3, 20), d(3, 22)),
            (d(2, 25), d(3, 3)),
            (d(4, 1), d(4, 1)),
            (d(3, 24), d(4, 3)),
            (d(3, 5), d(3, 6)),
        ];
        for (start, end) in requests {
            let _ = s.add_period(&mut t, start, end);
            assert_no_overlaps(&t);
        }
        let ids: Vec<_> = t.periods.iter().map(|p| p.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            let offset = i as i64 * 3;
            let (start, end) = (d(3, 1) + chrono::Duration::days(offset), d(3, 4) + chrono::Duration::days(offset));
            let _ = s.move_period(&mut t, id, start, end);
            assert_no_overlaps(&t);
        }
    }
}
