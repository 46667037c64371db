pub mod board;
pub mod period;
pub mod task;
pub mod timeline;

pub use board::Board;
pub use period::{Period, PeriodId, ToDay};
pub use task::{Assignees, Task, TaskId};
pub use timeline::TimelineViewport;
