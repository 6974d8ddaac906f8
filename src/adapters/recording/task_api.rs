//! Recording adapter for the `TaskApi` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Value};

use super::record_result;
use crate::api::ApiError;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId,
    TaskStatistics, TaskStatus,
};
use crate::ports::task_api::{ApiFuture, TaskApi};

/// Records task service interactions while delegating to an inner implementation.
pub struct RecordingTaskApi {
    inner: Box<dyn TaskApi>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskApi {
    /// Wraps `inner`, writing every call and its result to `recorder`.
    pub fn new(inner: Box<dyn TaskApi>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn recorded<'a, T>(
        &'a self,
        method: &'static str,
        input: Value,
        call: ApiFuture<'a, T>,
    ) -> ApiFuture<'a, T>
    where
        T: Serialize + Send + 'a,
    {
        Box::pin(async move {
            let result: Result<T, ApiError> = call.await;
            record_result(&self.recorder, "api", method, &input, &result);
            result
        })
    }
}

impl TaskApi for RecordingTaskApi {
    fn create_task(&self, request: &CreateTaskRequest) -> ApiFuture<'_, Task> {
        let input = serde_json::to_value(request).unwrap_or(Value::Null);
        self.recorded("create_task", input, self.inner.create_task(request))
    }

    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>> {
        self.recorded("list_tasks", json!({}), self.inner.list_tasks())
    }

    fn list_recent_tasks(&self, limit: usize) -> ApiFuture<'_, Vec<Task>> {
        self.recorded(
            "list_recent_tasks",
            json!({ "limit": limit }),
            self.inner.list_recent_tasks(limit),
        )
    }

    fn get_task(&self, id: TaskId) -> ApiFuture<'_, Task> {
        self.recorded("get_task", json!({ "id": id }), self.inner.get_task(id))
    }

    fn list_tasks_by_status(&self, status: TaskStatus) -> ApiFuture<'_, Vec<Task>> {
        self.recorded(
            "list_tasks_by_status",
            json!({ "status": status }),
            self.inner.list_tasks_by_status(status),
        )
    }

    fn cancel_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.recorded("cancel_task", json!({ "id": id }), self.inner.cancel_task(id))
    }

    fn stop_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.recorded("stop_task", json!({ "id": id }), self.inner.stop_task(id))
    }

    fn retry_task(&self, id: TaskId) -> ApiFuture<'_, Task> {
        self.recorded("retry_task", json!({ "id": id }), self.inner.retry_task(id))
    }

    fn delete_task(&self, id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.recorded("delete_task", json!({ "id": id }), self.inner.delete_task(id))
    }

    fn statistics(&self) -> ApiFuture<'_, TaskStatistics> {
        self.recorded("statistics", json!({}), self.inner.statistics())
    }

    fn running_count(&self) -> ApiFuture<'_, RunningCount> {
        self.recorded("running_count", json!({}), self.inner.running_count())
    }

    fn system_status(&self) -> ApiFuture<'_, SystemStatus> {
        self.recorded("system_status", json!({}), self.inner.system_status())
    }
}
