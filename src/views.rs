//! Projections over the cached task collection.
//!
//! Nothing here is stored; every view is recomputed from the slice it is
//! given, so it can never drift from the collection.

use crate::model::{Task, TaskStatistics, TaskStatus};

/// How many tasks [`recent_tasks`] keeps.
pub const RECENT_VIEW_LIMIT: usize = 10;

/// Tasks with the given status, in collection order.
#[must_use]
pub fn tasks_with_status(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks.iter().filter(|t| t.status == status).cloned().collect()
}

/// Tasks currently being worked on.
#[must_use]
pub fn running_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks_with_status(tasks, TaskStatus::Running)
}

/// Tasks waiting for a worker.
#[must_use]
pub fn pending_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks_with_status(tasks, TaskStatus::Pending)
}

/// Tasks that finished successfully.
#[must_use]
pub fn completed_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks_with_status(tasks, TaskStatus::Completed)
}

/// Tasks that failed.
#[must_use]
pub fn failed_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks_with_status(tasks, TaskStatus::Failed)
}

/// Tasks cancelled or stopped on request.
#[must_use]
pub fn cancelled_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks_with_status(tasks, TaskStatus::Cancelled)
}

/// Newest first by creation time, at most [`RECENT_VIEW_LIMIT`] entries.
/// Tasks created at the same instant keep their collection order.
#[must_use]
pub fn recent_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut recent = tasks.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_VIEW_LIMIT);
    recent
}

/// Per-status counts over the cached collection only.
#[must_use]
pub fn local_statistics(tasks: &[Task]) -> TaskStatistics {
    TaskStatistics::from_tasks(tasks)
}
