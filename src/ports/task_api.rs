//! Port for the remote task service.

use std::future::Future;
use std::pin::Pin;

use crate::api::ApiError;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId,
    TaskStatistics, TaskStatus,
};

/// Boxed future returned by every [`TaskApi`] method; keeps the trait dyn-compatible.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// One method per remote resource action.
///
/// Implementations must log each request and response and normalize every
/// failure into an [`ApiError`]; they never touch client-side state.
pub trait TaskApi: Send + Sync {
    /// `POST /tasks`. The returned record carries the server-assigned id.
    fn create_task(&self, request: &CreateTaskRequest) -> ApiFuture<'_, Task>;

    /// `GET /tasks`.
    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>>;

    /// `GET /tasks/recent?limit=N`.
    fn list_recent_tasks(&self, limit: usize) -> ApiFuture<'_, Vec<Task>>;

    /// `GET /tasks/{id}`.
    fn get_task(&self, id: TaskId) -> ApiFuture<'_, Task>;

    /// `GET /tasks/status/{status}`.
    fn list_tasks_by_status(&self, status: TaskStatus) -> ApiFuture<'_, Vec<Task>>;

    /// `PUT /tasks/{id}/cancel`.
    fn cancel_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement>;

    /// `POST /tasks/{id}/stop`.
    fn stop_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement>;

    /// `POST /tasks/{id}/retry`. Returns the task as restarted by the server.
    fn retry_task(&self, id: TaskId) -> ApiFuture<'_, Task>;

    /// `DELETE /tasks/{id}`.
    fn delete_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement>;

    /// `GET /tasks/statistics`.
    fn statistics(&self) -> ApiFuture<'_, TaskStatistics>;

    /// `GET /tasks/running/count`.
    fn running_count(&self) -> ApiFuture<'_, RunningCount>;

    /// `GET /system/status`.
    fn system_status(&self) -> ApiFuture<'_, SystemStatus>;
}
