//! Data model shared by the API boundary, the store and the formatters.

pub mod statistics;
pub mod status;
pub mod task;
pub mod timestamp;

pub use statistics::{Acknowledgement, RunningCount, SystemStatus, TaskStatistics};
pub use status::TaskStatus;
pub use task::{CreateTaskRequest, Task, TaskId};
