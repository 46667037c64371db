//! Pointer-drag state for drawing, moving and resizing periods.
//!
//! A drag is purely visual until `finish` hands back a `DragCommit`; the
//! caller applies it through the scheduler. `cancel` drops the drag and
//! nothing needs rolling back.

use chrono::NaiveDate;

use crate::error::SchedulerError;
use crate::model::period::shift_days;
use crate::model::{PeriodId, Task, TaskId, TimelineViewport};

/// Which edge a resize drag holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragKind {
    /// Drawing a new period on an empty stretch of the row.
    Create,
    Move(PeriodId),
    Resize(PeriodId, ResizeEdge),
}

/// Snapshot taken when the pointer went down.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub task_id: TaskId,
    pub kind: DragKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_pointer_x: f32,
}

/// The scheduler call a finished drag asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragCommit {
    Add {
        task_id: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },
    Move {
        task_id: TaskId,
        period_id: PeriodId,
        start: NaiveDate,
        end: NaiveDate,
    },
    Resize {
        task_id: TaskId,
        period_id: PeriodId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Start drawing a new period at the pointer.
    pub fn begin_create(
        &mut self,
        task_id: TaskId,
        pointer_x: f32,
        viewport: &TimelineViewport,
    ) -> Result<(), SchedulerError> {
        let date = viewport.x_to_date(pointer_x);
        self.begin(DragSession {
            task_id,
            kind: DragKind::Create,
            start: date,
            end: date,
            start_pointer_x: pointer_x,
        })
    }

    /// Grab a period's body to move it.
    pub fn begin_move(
        &mut self,
        task: &Task,
        period_id: &PeriodId,
        pointer_x: f32,
    ) -> Result<(), SchedulerError> {
        self.begin_on_period(task, period_id, DragKind::Move(period_id.clone()), pointer_x)
    }

    /// Grab one edge of a period.
    pub fn begin_resize(
        &mut self,
        task: &Task,
        period_id: &PeriodId,
        edge: ResizeEdge,
        pointer_x: f32,
    ) -> Result<(), SchedulerError> {
        self.begin_on_period(task, period_id, DragKind::Resize(period_id.clone(), edge), pointer_x)
    }

    /// Range to draw while the pointer is at `pointer_x`.
    pub fn preview(&self, pointer_x: f32, viewport: &TimelineViewport) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session.range_at(pointer_x, viewport)),
        }
    }

    /// Release the pointer. Returns to `Idle` and reports what to commit.
    pub fn finish(&mut self, pointer_x: f32, viewport: &TimelineViewport) -> Option<DragCommit> {
        let session = match std::mem::take(self) {
            Self::Idle => return None,
            Self::Dragging(session) => session,
        };
        let (start, end) = session.range_at(pointer_x, viewport);
        let task_id = session.task_id;
        Some(match session.kind {
            DragKind::Create => DragCommit::Add { task_id, start, end },
            DragKind::Move(period_id) => DragCommit::Move {
                task_id,
                period_id,
                start,
                end,
            },
            DragKind::Resize(period_id, _) => DragCommit::Resize {
                task_id,
                period_id,
                start,
                end,
            },
        })
    }

    /// Abandon the drag without committing anything.
    pub fn cancel(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    fn begin_on_period(
        &mut self,
        task: &Task,
        period_id: &PeriodId,
        kind: DragKind,
        pointer_x: f32,
    ) -> Result<(), SchedulerError> {
        let period = task
            .period(period_id)
            .ok_or_else(|| SchedulerError::PeriodNotFound(period_id.clone()))?;
        self.begin(DragSession {
            task_id: task.id,
            kind,
            start: period.start,
            end: period.end,
            start_pointer_x: pointer_x,
        })
    }

    fn begin(&mut self, session: DragSession) -> Result<(), SchedulerError> {
        if self.is_dragging() {
            return Err(SchedulerError::Validation("a drag is already in progress".into()));
        }
        *self = Self::Dragging(session);
        Ok(())
    }
}

impl DragSession {
    /// Range under the pointer. A move or resize that would leave the
    /// calendar keeps the grabbed range.
    fn range_at(&self, pointer_x: f32, viewport: &TimelineViewport) -> (NaiveDate, NaiveDate) {
        let day_delta = viewport.days_for(pointer_x - self.start_pointer_x);
        let shift = |date: NaiveDate| shift_days(date, day_delta);
        match &self.kind {
            DragKind::Create => {
                let other = shift(self.start).unwrap_or(if day_delta < 0 {
                    NaiveDate::MIN
                } else {
                    NaiveDate::MAX
                });
                (self.start.min(other), self.start.max(other))
            }
            DragKind::Move(_) => match (shift(self.start), shift(self.end)) {
                (Some(start), Some(end)) => (start, end),
                _ => (self.start, self.end),
            },
            DragKind::Resize(_, ResizeEdge::Start) => match shift(self.start) {
                Some(new_start) if new_start < self.end => (new_start, self.end),
                _ => (self.start, self.end),
            },
            DragKind::Resize(_, ResizeEdge::End) => match shift(self.end) {
                Some(new_end) if new_end > self.start => (self.start, new_end),
                _ => (self.start, self.end),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Period;
    use pretty_assertions::assert_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    // 18 px per day, day 0 = 2024-03-01.
    fn viewport() -> TimelineViewport {
        TimelineViewport::new(d(3, 1), d(4, 30))
    }

    fn task_with_period() -> (Task, PeriodId) {
        let mut task = Task::new(TaskId(7), "ORD-7", d(3, 10), d(3, 20));
        let id = PeriodId::from("p1");
        task.periods.push(Period::new(id.clone(), "Trial run", d(4, 1), d(4, 5), "#FF69B4"));
        (task, id)
    }

    #[test]
    fn create_orders_endpoints() {
        let vp = viewport();
        let mut drag = DragState::default();
        drag.begin_create(TaskId(7), 5.0 * 18.0, &vp).unwrap();

        assert_eq!(drag.preview(2.0 * 18.0, &vp), Some((d(3, 3), d(3, 6))));
        let commit = drag.finish(2.0 * 18.0, &vp).unwrap();
        assert_eq!(
            commit,
            DragCommit::Add {
                task_id: TaskId(7),
                start: d(3, 3),
                end: d(3, 6)
            }
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn move_keeps_duration() {
        let vp = viewport();
        let (task, id) = task_with_period();
        let mut drag = DragState::default();
        drag.begin_move(&task, &id, 100.0).unwrap();

        let commit = drag.finish(100.0 + 3.0 * 18.0, &vp).unwrap();
        assert_eq!(
            commit,
            DragCommit::Move {
                task_id: TaskId(7),
                period_id: id,
                start: d(4, 4),
                end: d(4, 8)
            }
        );
    }

    #[test]
    fn resize_never_crosses_the_other_edge() {
        let vp = viewport();
        let (task, id) = task_with_period();
        let mut drag = DragState::default();
        drag.begin_resize(&task, &id, ResizeEdge::Start, 0.0).unwrap();

        assert_eq!(drag.preview(2.0 * 18.0, &vp), Some((d(4, 3), d(4, 5))));
        // Dragging past the end edge is ignored.
        assert_eq!(drag.preview(10.0 * 18.0, &vp), Some((d(4, 1), d(4, 5))));

        drag.cancel();
        drag.begin_resize(&task, &id, ResizeEdge::End, 0.0).unwrap();
        assert_eq!(drag.preview(-10.0 * 18.0, &vp), Some((d(4, 1), d(4, 5))));
        assert_eq!(drag.preview(18.0, &vp), Some((d(4, 1), d(4, 6))));
    }

    #[test]
    fn far_pointer_travel_stays_on_the_calendar() {
        let vp = viewport();
        let (task, id) = task_with_period();
        let mut drag = DragState::default();
        drag.begin_move(&task, &id, 0.0).unwrap();
        assert_eq!(drag.preview(f32::MAX, &vp), Some((d(4, 1), d(4, 5))));
        drag.cancel();

        drag.begin_resize(&task, &id, ResizeEdge::End, 0.0).unwrap();
        assert_eq!(drag.preview(f32::MAX, &vp), Some((d(4, 1), d(4, 5))));
        drag.cancel();

        drag.begin_create(TaskId(7), 0.0, &vp).unwrap();
        assert_eq!(drag.preview(f32::MIN, &vp), Some((NaiveDate::MIN, d(3, 1))));
    }

    #[test]
    fn cancel_commits_nothing() {
        let vp = viewport();
        let (task, id) = task_with_period();
        let mut drag = DragState::default();
        drag.begin_move(&task, &id, 0.0).unwrap();

        assert!(drag.cancel().is_some());
        assert_eq!(drag.finish(50.0, &vp), None);
        assert!(drag.cancel().is_none());
    }

    #[test]
    fn only_one_drag_at_a_time() {
        let vp = viewport();
        let (task, id) = task_with_period();
        let mut drag = DragState::default();
        drag.begin_move(&task, &id, 0.0).unwrap();
        assert!(drag.begin_create(TaskId(7), 0.0, &vp).is_err());
    }

    #[test]
    fn unknown_period_cannot_be_grabbed() {
        let (task, _) = task_with_period();
        let mut drag = DragState::default();
        let err = drag.begin_move(&task, &PeriodId::from("ghost"), 0.0).unwrap_err();
        assert!(matches!(err, SchedulerError::PeriodNotFound(_)));
        assert!(!drag.is_dragging());
    }
}
