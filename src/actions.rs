//! User-facing actions over a [`TaskStore`].
//!
//! Each action returns an [`ActionOutcome`] instead of a `Result`, so a
//! caller handles success and failure through one shape. Mutations refresh
//! the statistics aggregate once the primary change has been applied.

use tracing::debug;

use crate::api::{ApiError, FALLBACK_MESSAGE};
use crate::format::{action_message, Action, Locale};
use crate::model::{Acknowledgement, SystemStatus, Task, TaskId, TaskStatistics, TaskStatus};
use crate::store::TaskStore;

/// Result of an action as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome<T> {
    /// Whether the action went through.
    pub success: bool,
    /// The payload on success.
    pub data: Option<T>,
    /// Confirmation text on success, the error message on failure.
    pub message: Option<String>,
}

impl<T> ActionOutcome<T> {
    fn succeeded(data: T, message: Option<&str>) -> Self {
        Self { success: true, data: Some(data), message: message.map(String::from) }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    fn from_result(result: Result<T, ApiError>, message: Option<&str>) -> Self {
        match result {
            Ok(data) => Self::succeeded(data, message),
            Err(err) => Self::failed(err.message),
        }
    }

    /// The payload, or the failure message.
    ///
    /// # Errors
    ///
    /// Returns the outcome's message when the action failed.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self { success: true, data: Some(data), .. } => Ok(data),
            Self { message, .. } => Err(message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string())),
        }
    }
}

/// Runs actions against a store, rendering messages in the context's locale.
pub struct TaskActions<'s, 'a> {
    store: &'s TaskStore<'a>,
    locale: Locale,
}

impl<'s, 'a> TaskActions<'s, 'a> {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: &'s TaskStore<'a>) -> Self {
        Self { store, locale: store.context().config.locale }
    }

    /// The wrapped store, for reads.
    #[must_use]
    pub fn store(&self) -> &'s TaskStore<'a> {
        self.store
    }

    async fn mutated<T>(&self, action: Action, result: Result<T, ApiError>) -> ActionOutcome<T> {
        if result.is_ok() {
            debug!(?action, "refreshing statistics after mutation");
            self.store.load_statistics().await;
        }
        ActionOutcome::from_result(result, Some(action_message(action, self.locale)))
    }

    /// Creates a task.
    pub async fn create_task(&self, url: &str, view_count: u64) -> ActionOutcome<Task> {
        let result = self.store.create_task(url, view_count).await;
        self.mutated(Action::Create, result).await
    }

    /// Cancels a task.
    pub async fn cancel_task(&self, id: TaskId) -> ActionOutcome<Task> {
        let result = self.store.cancel_task(id).await;
        self.mutated(Action::Cancel, result).await
    }

    /// Stops a running task.
    pub async fn stop_task(&self, id: TaskId) -> ActionOutcome<Task> {
        let result = self.store.stop_task(id).await;
        self.mutated(Action::Stop, result).await
    }

    /// Restarts a task.
    pub async fn retry_task(&self, id: TaskId) -> ActionOutcome<Task> {
        let result = self.store.retry_task(id).await;
        self.mutated(Action::Retry, result).await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: TaskId) -> ActionOutcome<Acknowledgement> {
        let result = self.store.delete_task(id).await;
        self.mutated(Action::Delete, result).await
    }

    /// Loads every task.
    pub async fn load_tasks(&self) -> ActionOutcome<Vec<Task>> {
        ActionOutcome::from_result(self.store.load_tasks().await, None)
    }

    /// Loads the `limit` most recent tasks.
    pub async fn load_recent_tasks(&self, limit: usize) -> ActionOutcome<Vec<Task>> {
        ActionOutcome::from_result(self.store.load_recent_tasks(limit).await, None)
    }

    /// Loads and focuses one task.
    pub async fn load_task(&self, id: TaskId) -> ActionOutcome<Task> {
        ActionOutcome::from_result(self.store.load_task(id).await, None)
    }

    /// Reloads the recent window and the statistics.
    pub async fn refresh_all_tasks(&self, limit: usize) -> ActionOutcome<Vec<Task>> {
        ActionOutcome::from_result(self.store.refresh_all_tasks(limit).await, None)
    }

    /// Refreshes the statistics aggregate.
    pub async fn load_statistics(&self) -> ActionOutcome<TaskStatistics> {
        match self.store.load_statistics().await {
            Some(statistics) => ActionOutcome::succeeded(statistics, None),
            None => ActionOutcome::failed(match self.locale {
                Locale::ZhTw => "無法取得統計資料",
                Locale::En => "Statistics are unavailable",
            }),
        }
    }

    /// Lists tasks with one status from the service.
    pub async fn fetch_tasks_by_status(&self, status: TaskStatus) -> ActionOutcome<Vec<Task>> {
        ActionOutcome::from_result(self.store.fetch_tasks_by_status(status).await, None)
    }

    /// Counts running tasks on the service.
    pub async fn fetch_running_count(&self) -> ActionOutcome<u64> {
        ActionOutcome::from_result(self.store.fetch_running_count().await, None)
    }

    /// Fetches the service's health report.
    pub async fn fetch_system_status(&self) -> ActionOutcome<SystemStatus> {
        ActionOutcome::from_result(self.store.fetch_system_status().await, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::test_support::{task_json, Script};
    use serde_json::json;

    const T0: &str = "2024-05-01T10:00:00";

    #[tokio::test]
    async fn create_refreshes_statistics_after_inserting() {
        let ctx = Script::new()
            .ok("create_task", task_json(1, "PENDING", 0, 50, T0))
            .ok("statistics", json!({"pendingCount": 1}))
            .context();
        let store = TaskStore::new(&ctx);
        let actions = TaskActions::new(&store);

        let outcome = actions.create_task("https://x/reel/1", 50).await;
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("任務建立成功"));
        assert_eq!(outcome.data.unwrap().id, TaskId(1));
        assert_eq!(store.statistics().pending_count, 1);
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn failure_becomes_an_outcome_without_refreshing() {
        // No statistics interaction is scripted; a refresh would exhaust the cassette.
        let ctx = Script::new().server_err("delete_task", 404, "Task not found").context();
        let store = TaskStore::new(&ctx);
        let actions = TaskActions::new(&store);

        let outcome = actions.delete_task(TaskId(3)).await;
        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        assert_eq!(outcome.message.as_deref(), Some("Task not found"));
        assert_eq!(outcome.into_result().unwrap_err(), "Task not found");
        assert_eq!(store.error().as_deref(), Some("Task not found"));
    }

    #[tokio::test]
    async fn messages_follow_the_locale() {
        let config = ClientConfig { locale: Locale::En, ..ClientConfig::default() };
        let ctx = Script::new()
            .ok("retry_task", task_json(2, "PENDING", 0, 10, T0))
            .transport_err("statistics", "connect ECONNREFUSED")
            .context_with(config);
        let store = TaskStore::new(&ctx);
        let actions = TaskActions::new(&store);

        let outcome = actions.retry_task(TaskId(2)).await;
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Task restarted"));
    }

    #[tokio::test]
    async fn stop_reports_the_refetched_record() {
        let ctx = Script::new()
            .ok("stop_task", json!({}))
            .ok("get_task", task_json(6, "CANCELLED", 3, 10, T0))
            .ok("statistics", json!({"cancelledCount": 1}))
            .context();
        let store = TaskStore::new(&ctx);
        let actions = TaskActions::new(&store);

        let task = actions.stop_task(TaskId(6)).await.into_result().unwrap();
        assert_eq!(task.status, TaskStatus::Cancelled);
        assert_eq!(store.statistics().cancelled_count, 1);
    }

    #[tokio::test]
    async fn unavailable_statistics_fail_softly() {
        let ctx = Script::new().transport_err("statistics", "down").context();
        let store = TaskStore::new(&ctx);
        let outcome = TaskActions::new(&store).load_statistics().await;
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("無法取得統計資料"));
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn reads_carry_no_message() {
        let ctx = Script::new().ok("running_count", json!({"count": 2})).context();
        let store = TaskStore::new(&ctx);
        let outcome = TaskActions::new(&store).fetch_running_count().await;
        assert_eq!(outcome, ActionOutcome { success: true, data: Some(2), message: None });
    }
}
