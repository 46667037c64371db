//! Collaborator seams: the timeline widget and the remote store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Assignees, Task, TaskId};

/// The timeline widget hosting the tasks.
///
/// The scheduler only reads task bounds and mutates `Task::periods`
/// through this trait; redraws are requested by the caller after a commit.
pub trait ChartHost {
    fn task(&self, id: TaskId) -> Option<&Task>;

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task>;

    /// Date under a timeline x-position.
    fn date_from_pos(&self, x: f32) -> NaiveDate;

    /// Ask the widget to redraw one task row.
    fn refresh_task(&mut self, id: TaskId);
}

/// One stored task record as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: TaskId,
    #[serde(default)]
    pub order_no: Option<String>,
    /// Machine or unit within the order; breaks ties between equal order numbers.
    #[serde(rename = "machine-unit", default)]
    pub machine_unit: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub resource_id: Assignees,
    #[serde(default)]
    pub place_id: Assignees,
    /// Opaque period blob, `None` when the task has no periods.
    #[serde(default)]
    pub periods: Option<String>,
}

/// Persistence backend. Implementations own retries; callers never retry.
pub trait RemoteStore {
    fn load_rows(&self) -> Result<Vec<TaskRow>, StoreError>;

    fn save_periods(&mut self, task: TaskId, blob: Option<String>) -> Result<(), StoreError>;
}
