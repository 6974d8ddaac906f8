//! Replaying adapter for the `TaskApi` port.

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId,
    TaskStatistics, TaskStatus,
};
use crate::ports::task_api::{ApiFuture, TaskApi};

/// Serves recorded task service responses from a cassette.
///
/// Calls are matched by method name only, in recorded order; request
/// arguments are not compared.
pub struct ReplayingTaskApi {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskApi {
    /// Creates a replaying client from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T>(&self, method: &str) -> ApiFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        // Consume the interaction now so replay order follows call order,
        // not the order in which futures are first polled.
        let output = next_output(&self.replayer, "api", method);
        Box::pin(async move {
            tokio::task::yield_now().await;
            replay_result(output)
        })
    }
}

impl TaskApi for ReplayingTaskApi {
    fn create_task(&self, _request: &CreateTaskRequest) -> ApiFuture<'_, Task> {
        self.replay("create_task")
    }

    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>> {
        self.replay("list_tasks")
    }

    fn list_recent_tasks(&self, _limit: usize) -> ApiFuture<'_, Vec<Task>> {
        self.replay("list_recent_tasks")
    }

    fn get_task(&self, _id: TaskId) -> ApiFuture<'_, Task> {
        self.replay("get_task")
    }

    fn list_tasks_by_status(&self, _status: TaskStatus) -> ApiFuture<'_, Vec<Task>> {
        self.replay("list_tasks_by_status")
    }

    fn cancel_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.replay("cancel_task")
    }

    fn stop_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.replay("stop_task")
    }

    fn retry_task(&self, _id: TaskId) -> ApiFuture<'_, Task> {
        self.replay("retry_task")
    }

    fn delete_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        self.replay("delete_task")
    }

    fn statistics(&self) -> ApiFuture<'_, TaskStatistics> {
        self.replay("statistics")
    }

    fn running_count(&self) -> ApiFuture<'_, RunningCount> {
        self.replay("running_count")
    }

    fn system_status(&self) -> ApiFuture<'_, SystemStatus> {
        self.replay("system_status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::cassette::recorder::CassetteRecorder;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn serves_recorded_payloads_per_method() {
        let mut recorder = CassetteRecorder::new("/dev/null", "test", "abc");
        recorder.record("api", "running_count", json!({}), json!({"Ok": {"count": 2}}));
        recorder.record(
            "api",
            "statistics",
            json!({}),
            json!({"Err": {"kind": "transport", "message": "timeout of 30000ms exceeded"}}),
        );
        let api = ReplayingTaskApi::new(CassetteReplayer::new(&recorder.into_cassette(Utc::now())));

        let err = api.statistics().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(api.running_count().await.unwrap().count, 2);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_method_panics() {
        let recorder = CassetteRecorder::new("/dev/null", "test", "abc");
        let api = ReplayingTaskApi::new(CassetteReplayer::new(&recorder.into_cassette(Utc::now())));
        let _ = api.list_tasks();
    }
}
