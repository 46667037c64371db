//! Glue between the scheduler, the chart widget and the backend.
//!
//! Every mutation runs against the in-memory task, is persisted as a period
//! blob, and only then asks the widget to redraw the row. A store failure
//! puts the task's periods back the way they were and is returned as-is.

use log::{debug, warn};

use crate::error::{SchedulerError, ServiceError, StoreError};
use crate::host::{ChartHost, RemoteStore};
use crate::io::periods::serialize_periods;
use crate::model::{Board, Period, PeriodId, Task, TaskId, ToDay};
use crate::scheduler::{DragCommit, PeriodChange, PeriodScheduler};

pub struct PeriodService<H, S> {
    host: H,
    store: S,
    scheduler: PeriodScheduler,
}

impl<S: RemoteStore> PeriodService<Board, S> {
    /// Load every stored task into a fresh board.
    pub fn load(store: S, scheduler: PeriodScheduler) -> Result<Self, ServiceError> {
        let rows = store.load_rows()?;
        debug!("loaded {} task rows", rows.len());
        Ok(Self::new(Board::from_rows(rows), store, scheduler))
    }
}

impl<H: ChartHost, S: RemoteStore> PeriodService<H, S> {
    pub fn new(host: H, store: S, scheduler: PeriodScheduler) -> Self {
        Self {
            host,
            store,
            scheduler,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &PeriodScheduler {
        &self.scheduler
    }

    pub fn task(&self, task_id: TaskId) -> Result<&Task, ServiceError> {
        self.host
            .task(task_id)
            .ok_or_else(|| SchedulerError::TaskNotFound(task_id).into())
    }

    pub fn add_period<D: ToDay>(
        &mut self,
        task_id: TaskId,
        start: D,
        end: D,
    ) -> Result<PeriodChange, ServiceError> {
        self.mutate(task_id, |s, task| s.add_period(task, start, end))
    }

    pub fn move_period<D: ToDay>(
        &mut self,
        task_id: TaskId,
        period_id: &PeriodId,
        start: D,
        end: D,
    ) -> Result<PeriodChange, ServiceError> {
        self.mutate(task_id, |s, task| s.move_period(task, period_id, start, end))
    }

    pub fn resize_period<D: ToDay>(
        &mut self,
        task_id: TaskId,
        period_id: &PeriodId,
        start: D,
        end: D,
    ) -> Result<PeriodChange, ServiceError> {
        self.mutate(task_id, |s, task| s.resize_period(task, period_id, start, end))
    }

    /// Delete a period. Returns false, without touching the store, when the
    /// period is already gone.
    pub fn delete_period(&mut self, task_id: TaskId, period_id: &PeriodId) -> Result<bool, ServiceError> {
        let removed = self.mutate(task_id, |s, task| Ok(s.delete_period(task, period_id)))?;
        Ok(removed.is_some())
    }

    /// Apply the result of a finished drag.
    pub fn commit_drag(&mut self, commit: DragCommit) -> Result<PeriodChange, ServiceError> {
        match commit {
            DragCommit::Add { task_id, start, end } => self.add_period(task_id, start, end),
            DragCommit::Move {
                task_id,
                period_id,
                start,
                end,
            } => self.move_period(task_id, &period_id, start, end),
            DragCommit::Resize {
                task_id,
                period_id,
                start,
                end,
            } => self.resize_period(task_id, &period_id, start, end),
        }
    }

    /// Run `op` on the task, then persist and redraw if the periods changed.
    fn mutate<T>(
        &mut self,
        task_id: TaskId,
        op: impl FnOnce(&PeriodScheduler, &mut Task) -> Result<T, SchedulerError>,
    ) -> Result<T, ServiceError> {
        let scheduler = &self.scheduler;
        let task = self
            .host
            .task_mut(task_id)
            .ok_or(SchedulerError::TaskNotFound(task_id))?;
        let before = task.periods.clone();
        let out = op(scheduler, task)?;
        if task.periods == before {
            return Ok(out);
        }

        if let Err(e) = self.persist(task_id) {
            warn!("saving periods for task {} failed, reverting: {}", task_id, e);
            self.restore(task_id, before);
            return Err(e);
        }
        self.host.refresh_task(task_id);
        Ok(out)
    }

    fn persist(&mut self, task_id: TaskId) -> Result<(), ServiceError> {
        let task = self.task(task_id)?;
        let blob = serialize_periods(&task.periods).map_err(StoreError::from)?;
        self.store.save_periods(task_id, blob)?;
        Ok(())
    }

    fn restore(&mut self, task_id: TaskId, periods: Vec<Period>) {
        if let Some(task) = self.host.task_mut(task_id) {
            task.periods = periods;
        }
    }
}
