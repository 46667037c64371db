use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

use super::period::shift_days;
use super::task::{Task, TaskId};
use super::timeline::TimelineViewport;
use crate::host::{ChartHost, TaskRow};
use crate::io::periods::deserialize_periods;

/// In-memory scheduling board: the loaded tasks plus the visible timeline.
#[derive(Debug, Clone)]
pub struct Board {
    pub tasks: Vec<Task>,
    pub viewport: TimelineViewport,
    pub modified: DateTime<Utc>,
    /// Rows waiting for a redraw, in request order.
    pending_redraw: Vec<TaskId>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        let today = Utc::now().date_naive();
        let first = tasks.iter().map(|t| t.start).min().unwrap_or(today);
        let last = tasks.iter().map(|t| t.end).max().unwrap_or(today);
        let start = shift_days(first, -7).unwrap_or(first);
        let end = shift_days(last, 30).unwrap_or(last);
        Self {
            tasks,
            viewport: TimelineViewport::new(start, end),
            modified: Utc::now(),
            pending_redraw: Vec::new(),
        }
    }

    /// Build a board from stored rows.
    ///
    /// Rows without dates are skipped. A broken period blob only costs that
    /// task its periods.
    pub fn from_rows(rows: Vec<TaskRow>) -> Self {
        let mut tasks: Vec<Task> = rows
            .into_iter()
            .filter_map(|row| {
                let (start, end) = match (row.start_date, row.end_date) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        warn!("skipping task {}: missing start or end date", row.id);
                        return None;
                    }
                };
                let mut task = Task::new(row.id, row.order_no.unwrap_or_default(), start, end);
                task.machine_unit = row.machine_unit;
                task.resources = row.resource_id;
                task.places = row.place_id;
                task.periods = deserialize_periods(row.periods.as_deref());
                Some(task)
            })
            .collect();
        tasks.sort_by(|a, b| {
            let unit_a = a.machine_unit.as_deref().unwrap_or("");
            let unit_b = b.machine_unit.as_deref().unwrap_or("");
            a.name
                .cmp(&b.name)
                .then(unit_a.cmp(unit_b))
                .then(a.id.cmp(&b.id))
        });
        Self::new(tasks)
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Drain the rows that asked for a redraw since the last call.
    pub fn take_redraws(&mut self) -> Vec<TaskId> {
        std::mem::take(&mut self.pending_redraw)
    }
}

impl ChartHost for Board {
    fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn date_from_pos(&self, x: f32) -> NaiveDate {
        self.viewport.x_to_date(x)
    }

    fn refresh_task(&mut self, id: TaskId) {
        self.touch();
        if !self.pending_redraw.contains(&id) {
            self.pending_redraw.push(id);
        }
    }
}
