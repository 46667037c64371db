//! Scheduling-board core: trial-run periods attached to Gantt tasks.
//!
//! `PeriodScheduler` keeps every task's periods clear of the task bar and of
//! each other. `PeriodService` wires it to a chart host and a remote store.

pub mod config;
pub mod error;
pub mod host;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod service;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, ServiceError, StoreError};
pub use host::{ChartHost, RemoteStore, TaskRow};
pub use model::{Assignees, Board, Period, PeriodId, Task, TaskId, TimelineViewport, ToDay};
pub use scheduler::{DragCommit, DragState, PeriodChange, PeriodScheduler, Resolution};
pub use service::PeriodService;
