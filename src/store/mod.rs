//! Task store: the client-side copy of remote task state.
//!
//! The store owns the task collection, the focused task, the loading flag,
//! the error slot and the statistics aggregate. Every remote call goes
//! through `ctx.api`, so the store works with live, recording and replaying
//! adapters alike.
//!
//! State sits behind a synchronous mutex that is only taken between await
//! points. Actions that target one task id (`load_task`, `cancel_task`,
//! `stop_task`, `retry_task`, `delete_task`) also hold a per-id async lock for
//! their whole duration, so overlapping actions on the same task apply their
//! results in the order they were started.

mod state;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::context::ServiceContext;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId, TaskStatistics,
    TaskStatus,
};
use crate::ports::task_api::ApiFuture;
use crate::views;

pub use state::StoreSnapshot;
use state::StoreState;

/// Client-side task state, synchronized with the remote service.
///
/// One store per [`ServiceContext`]; there is no global instance.
pub struct TaskStore<'a> {
    ctx: &'a ServiceContext,
    state: Mutex<StoreState>,
    id_locks: Mutex<HashMap<TaskId, Arc<AsyncMutex<()>>>>,
}

/// Marks one request as outstanding until dropped.
struct Loading<'s> {
    state: &'s Mutex<StoreState>,
}

impl<'s> Loading<'s> {
    fn start(state: &'s Mutex<StoreState>) -> Self {
        lock(state).in_flight += 1;
        Self { state }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Serializes actions on one task id; the map entry goes away once nobody
/// holds or waits for it.
struct IdLock<'s> {
    locks: &'s Mutex<HashMap<TaskId, Arc<AsyncMutex<()>>>>,
    id: TaskId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdLock<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = lock(self.locks);
        if locks.get(&self.id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            locks.remove(&self.id);
        }
    }
}

// A poisoned lock still holds consistent data: every write is one step.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<'a> TaskStore<'a> {
    /// Creates an empty store.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            state: Mutex::new(StoreState::default()),
            id_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The context this store talks through.
    #[must_use]
    pub fn context(&self) -> &'a ServiceContext {
        self.ctx
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.state)
    }

    fn loading(&self) -> Loading<'_> {
        Loading::start(&self.state)
    }

    /// Waits for earlier actions on `id` to finish.
    async fn lock_id(&self, id: TaskId) -> IdLock<'_> {
        let slot = Arc::clone(lock(&self.id_locks).entry(id).or_default());
        let guard = slot.lock_owned().await;
        IdLock { locks: &self.id_locks, id, guard: Some(guard) }
    }

    /// Records a failure in the error slot and hands it back.
    fn check<T>(&self, operation: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.map_err(|err| {
            warn!(
                operation,
                kind = ?err.kind,
                status = ?err.status,
                error = %err,
                "request failed"
            );
            self.state().error = Some(err.message.clone());
            err
        })
    }

    // --- Actions ---

    /// Creates a task and puts it at the head of the collection.
    ///
    /// No local validation is done; the service decides what is acceptable.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn create_task(&self, url: &str, view_count: u64) -> Result<Task, ApiError> {
        info!(url, view_count, "creating task");
        let request = CreateTaskRequest::new(url, view_count);
        let _loading = self.loading();
        let task = self.check("create_task", self.ctx.api.create_task(&request).await)?;
        self.state().insert_head(task.clone());
        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Replaces the collection with every task the service knows.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn load_tasks(&self) -> Result<Vec<Task>, ApiError> {
        info!("loading all tasks");
        let _loading = self.loading();
        let tasks = self.check("load_tasks", self.ctx.api.list_tasks().await)?;
        let mut state = self.state();
        state.replace_all(tasks);
        Ok(state.tasks.clone())
    }

    /// Replaces the collection with the `limit` most recent tasks.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn load_recent_tasks(&self, limit: usize) -> Result<Vec<Task>, ApiError> {
        info!(limit, "loading recent tasks");
        let _loading = self.loading();
        let tasks = self.check("load_recent_tasks", self.ctx.api.list_recent_tasks(limit).await)?;
        let mut state = self.state();
        state.replace_all(tasks);
        Ok(state.tasks.clone())
    }

    /// Fetches one task, focuses it and refreshes its cached entry in place.
    ///
    /// A non-terminal record for a task cached as terminal is treated as
    /// stale: the cached record is kept and returned.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn load_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let _serial = self.lock_id(id).await;
        self.load_task_locked(id).await
    }

    async fn load_task_locked(&self, id: TaskId) -> Result<Task, ApiError> {
        info!(task_id = %id, "loading task");
        let _loading = self.loading();
        let fetched = self.check("load_task", self.ctx.api.get_task(id).await)?;
        let task = self.state().apply_fetched(fetched);
        Ok(task)
    }

    /// Cancels a task, then reloads it so the cache shows the status the
    /// service settled on.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error from either request, which is also
    /// stored in the error slot.
    pub async fn cancel_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let _serial = self.lock_id(id).await;
        self.transition(id, "cancel_task", self.ctx.api.cancel_task(id)).await
    }

    /// Stops a running task, then reloads it.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error from either request, which is also
    /// stored in the error slot.
    pub async fn stop_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let _serial = self.lock_id(id).await;
        self.transition(id, "stop_task", self.ctx.api.stop_task(id)).await
    }

    async fn transition(
        &self,
        id: TaskId,
        operation: &str,
        call: ApiFuture<'_, Acknowledgement>,
    ) -> Result<Task, ApiError> {
        info!(task_id = %id, operation, "requesting transition");
        let ack = {
            let _loading = self.loading();
            self.check(operation, call.await)?
        };
        if let Some(message) = &ack.message {
            info!(task_id = %id, message, "transition acknowledged");
        }
        self.load_task_locked(id).await
    }

    /// Restarts a task and replaces the cached record with the service's
    /// response, whatever status it had locally. A task outside the cached
    /// window is not added to it.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn retry_task(&self, id: TaskId) -> Result<Task, ApiError> {
        let _serial = self.lock_id(id).await;
        self.retry_task_locked(id).await
    }

    async fn retry_task_locked(&self, id: TaskId) -> Result<Task, ApiError> {
        info!(task_id = %id, "retrying task");
        let _loading = self.loading();
        let task = self.check("retry_task", self.ctx.api.retry_task(id).await)?;
        self.state().apply_retried(task.clone());
        Ok(task)
    }

    /// Deletes a task remotely and drops it from the cache. Ids that are not
    /// cached are fine.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn delete_task(&self, id: TaskId) -> Result<Acknowledgement, ApiError> {
        let _serial = self.lock_id(id).await;
        self.delete_task_locked(id).await
    }

    async fn delete_task_locked(&self, id: TaskId) -> Result<Acknowledgement, ApiError> {
        info!(task_id = %id, "deleting task");
        let _loading = self.loading();
        let ack = self.check("delete_task", self.ctx.api.delete_task(id).await)?;
        if !self.state().remove(id) {
            info!(task_id = %id, "deleted task was not cached");
        }
        Ok(ack)
    }

    /// Refreshes the statistics aggregate.
    ///
    /// Failures are logged and leave both the aggregate and the error slot
    /// untouched; `None` reports that nothing was refreshed.
    pub async fn load_statistics(&self) -> Option<TaskStatistics> {
        let _loading = self.loading();
        match self.ctx.api.statistics().await {
            Ok(statistics) => {
                self.state().statistics = statistics;
                Some(statistics)
            }
            Err(err) => {
                warn!(kind = ?err.kind, error = %err, "statistics refresh failed");
                None
            }
        }
    }

    /// Reloads the recent window, then the statistics.
    ///
    /// # Errors
    ///
    /// Returns the error from loading the tasks; statistics failures are
    /// swallowed as in [`Self::load_statistics`].
    pub async fn refresh_all_tasks(&self, limit: usize) -> Result<Vec<Task>, ApiError> {
        let tasks = self.load_recent_tasks(limit).await?;
        self.load_statistics().await;
        Ok(tasks)
    }

    // --- Read-only remote queries ---

    /// Tasks with one status, straight from the service. The cache is not
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn fetch_tasks_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, ApiError> {
        info!(%status, "fetching tasks by status");
        let _loading = self.loading();
        self.check("fetch_tasks_by_status", self.ctx.api.list_tasks_by_status(status).await)
    }

    /// How many tasks the service is running right now.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn fetch_running_count(&self) -> Result<u64, ApiError> {
        let _loading = self.loading();
        let RunningCount { count } =
            self.check("fetch_running_count", self.ctx.api.running_count().await)?;
        Ok(count)
    }

    /// The service's own health report.
    ///
    /// # Errors
    ///
    /// Returns the normalized API error, which is also stored in the error slot.
    pub async fn fetch_system_status(&self) -> Result<SystemStatus, ApiError> {
        let _loading = self.loading();
        self.check("fetch_system_status", self.ctx.api.system_status().await)
    }

    // --- State access ---

    /// A consistent copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state().snapshot()
    }

    /// Returns the store to its initial state. Requests still in flight keep
    /// the loading flag set until they finish.
    pub fn reset(&self) {
        self.state().reset();
    }

    /// Empties the error slot.
    pub fn clear_error(&self) {
        self.state().error = None;
    }

    /// The cached collection.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    /// The focused task.
    #[must_use]
    pub fn current_task(&self) -> Option<Task> {
        self.state().current_task.clone()
    }

    /// Whether any request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().in_flight > 0
    }

    /// Message of the most recent failure.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Server-wide counts from the last successful refresh.
    #[must_use]
    pub fn statistics(&self) -> TaskStatistics {
        self.state().statistics
    }

    // --- Derived views ---

    /// Cached tasks that are running.
    #[must_use]
    pub fn running_tasks(&self) -> Vec<Task> {
        views::running_tasks(&self.state().tasks)
    }

    /// The newest cached tasks, at most [`views::RECENT_VIEW_LIMIT`].
    #[must_use]
    pub fn recent_tasks(&self) -> Vec<Task> {
        views::recent_tasks(&self.state().tasks)
    }

    /// Cached tasks waiting for a worker.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<Task> {
        views::pending_tasks(&self.state().tasks)
    }

    /// Cached tasks that finished successfully.
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        views::completed_tasks(&self.state().tasks)
    }

    /// Cached tasks that failed.
    #[must_use]
    pub fn failed_tasks(&self) -> Vec<Task> {
        views::failed_tasks(&self.state().tasks)
    }

    /// Cached tasks that were cancelled or stopped.
    #[must_use]
    pub fn cancelled_tasks(&self) -> Vec<Task> {
        views::cancelled_tasks(&self.state().tasks)
    }

    /// Cached tasks with the given status.
    #[must_use]
    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<Task> {
        views::tasks_with_status(&self.state().tasks, status)
    }

    /// Per-status counts over the cache.
    #[must_use]
    pub fn local_statistics(&self) -> TaskStatistics {
        views::local_statistics(&self.state().tasks)
    }
}
