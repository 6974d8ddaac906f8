//! The data a [`TaskStore`](super::TaskStore) holds, and the synchronous
//! reconciliation rules applied to it.

use std::collections::HashSet;

use tracing::warn;

use crate::model::{Task, TaskId, TaskStatistics, TaskStatus};

/// Everything the store knows, as one cloneable value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Cached tasks, most recently inserted first.
    pub tasks: Vec<Task>,
    /// The task last loaded by id.
    pub current_task: Option<Task>,
    /// Whether any request is outstanding.
    pub loading: bool,
    /// Message of the most recent failure, until cleared.
    pub error: Option<String>,
    /// Server-wide counts from the last successful statistics fetch.
    pub statistics: TaskStatistics,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) current_task: Option<Task>,
    pub(crate) in_flight: usize,
    pub(crate) error: Option<String>,
    pub(crate) statistics: TaskStatistics,
}

impl StoreState {
    pub(crate) fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.tasks.clone(),
            current_task: self.current_task.clone(),
            loading: self.in_flight > 0,
            error: self.error.clone(),
            statistics: self.statistics,
        }
    }

    /// Clears everything except the in-flight count, which belongs to
    /// requests that are still running.
    pub(crate) fn reset(&mut self) {
        let in_flight = self.in_flight;
        *self = Self { in_flight, ..Self::default() };
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn sync_current(&mut self, task: &Task) {
        if self.current_task.as_ref().is_some_and(|c| c.id == task.id) {
            self.current_task = Some(task.clone());
        }
    }

    /// A freshly created task goes to the head; an existing entry with the
    /// same id is dropped.
    pub(crate) fn insert_head(&mut self, task: Task) {
        if let Some(index) = self.position(task.id) {
            self.tasks.remove(index);
        }
        self.sync_current(&task);
        self.tasks.insert(0, task);
    }

    /// Replaces the collection with a server listing. Server truth wins,
    /// including over local terminal statuses.
    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::with_capacity(tasks.len());
        let mut unique = Vec::with_capacity(tasks.len());
        for task in tasks {
            if seen.insert(task.id) {
                unique.push(task);
            } else {
                warn!(task_id = %task.id, "dropping duplicate task in listing");
            }
        }
        if let Some(current) = &self.current_task {
            if let Some(fresh) = unique.iter().find(|t| t.id == current.id) {
                self.current_task = Some(fresh.clone());
            }
        }
        self.tasks = unique;
    }

    /// Applies a single fetched record: it becomes the focused task and
    /// replaces the cached entry in place. A pending or running record for a
    /// task cached as terminal is stale and ignored; statuses this client does
    /// not know are taken as given. Returns the record that ended up in the
    /// focused slot.
    pub(crate) fn apply_fetched(&mut self, task: Task) -> Task {
        let index = self.position(task.id);
        let cached = index
            .map(|i| &self.tasks[i])
            .or_else(|| self.current_task.as_ref().filter(|c| c.id == task.id));
        let reverts = matches!(task.status, TaskStatus::Pending | TaskStatus::Running);
        if let Some(cached) = cached {
            if cached.is_terminal() && reverts {
                warn!(
                    task_id = %task.id,
                    cached = %cached.status,
                    fetched = %task.status,
                    "ignoring stale task record"
                );
                let cached = cached.clone();
                self.current_task = Some(cached.clone());
                return cached;
            }
        }
        if let Some(index) = index {
            self.tasks[index] = task.clone();
        }
        self.current_task = Some(task.clone());
        task
    }

    /// A retried task replaces the cached entry wholesale, whatever its
    /// status was. Ids outside the collection leave it untouched, since an
    /// old record at the head would break newest-first order.
    pub(crate) fn apply_retried(&mut self, task: Task) {
        self.sync_current(&task);
        if let Some(index) = self.position(task.id) {
            self.tasks[index] = task;
        }
    }

    /// Drops `id` from the cache and the focused slot. Returns whether the
    /// collection held it.
    pub(crate) fn remove(&mut self, id: TaskId) -> bool {
        if self.current_task.as_ref().is_some_and(|c| c.id == id) {
            self.current_task = None;
        }
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}
