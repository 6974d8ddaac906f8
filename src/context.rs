//! Service context bundling the port trait objects the client depends on.

use std::path::Path;

use crate::adapters::live::{LiveClock, LiveTaskApi};
use crate::adapters::recording::{RecordingClock, RecordingTaskApi};
use crate::adapters::replaying::{ReplayingClock, ReplayingTaskApi};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::ClientConfig;
use crate::model::{
    Acknowledgement, CreateTaskRequest, RunningCount, SystemStatus, Task, TaskId,
    TaskStatistics, TaskStatus,
};
use crate::ports::clock::Clock;
use crate::ports::task_api::{ApiFuture, TaskApi};

/// Everything a [`TaskStore`](crate::store::TaskStore) needs from the outside.
///
/// Constructors wire different adapter implementations (live, recording,
/// replaying) behind the same ports.
pub struct ServiceContext {
    /// Remote task service.
    pub api: Box<dyn TaskApi>,
    /// Clock for relative timestamps.
    pub clock: Box<dyn Clock>,
    /// Settings the context was built with.
    pub config: ClientConfig,
}

impl ServiceContext {
    /// Assembles a context from explicit parts.
    #[must_use]
    pub fn new(api: Box<dyn TaskApi>, clock: Box<dyn Clock>, config: ClientConfig) -> Self {
        Self { api, clock, config }
    }

    /// A context talking to the configured service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: ClientConfig) -> Result<Self, String> {
        let api = LiveTaskApi::new(&config)?;
        Ok(Self::new(Box::new(api), Box::new(LiveClock), config))
    }

    /// A live context whose interactions are captured into `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(config: ClientConfig, session: &RecordingSession) -> Result<Self, String> {
        let api = LiveTaskApi::new(&config)?;
        Ok(Self::new(
            Box::new(RecordingTaskApi::new(Box::new(api), session.api.clone())),
            Box::new(RecordingClock::new(Box::new(LiveClock), session.clock.clone())),
            config,
        ))
    }

    /// A context served entirely from one cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path, config: ClientConfig) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::monolithic(path), config)
    }

    /// A context served from per-port cassettes. Unconfigured ports panic
    /// with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn replaying_from(
        cassettes: &CassetteConfig,
        config: ClientConfig,
    ) -> Result<Self, String> {
        let replayers = cassettes.load_all()?;
        let api: Box<dyn TaskApi> = match replayers.api {
            Some(r) => Box::new(ReplayingTaskApi::new(r)),
            None => Box::new(UnconfiguredTaskApi),
        };
        let clock: Box<dyn Clock> = match replayers.clock {
            Some(r) => Box::new(ReplayingClock::new(r)),
            None => Box::new(UnconfiguredClock),
        };
        Ok(Self::new(api, clock, config))
    }
}

// --- Panicking adapters for ports without a cassette ---

struct UnconfiguredClock;
impl Clock for UnconfiguredClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct UnconfiguredTaskApi;
impl UnconfiguredTaskApi {
    fn fail<T: 'static>(method: &str) -> ApiFuture<'static, T> {
        panic!(
            "TaskApi port not configured in CassetteConfig: no cassette loaded for api::{method}"
        );
    }
}

impl TaskApi for UnconfiguredTaskApi {
    fn create_task(&self, _request: &CreateTaskRequest) -> ApiFuture<'_, Task> {
        Self::fail("create_task")
    }
    fn list_tasks(&self) -> ApiFuture<'_, Vec<Task>> {
        Self::fail("list_tasks")
    }
    fn list_recent_tasks(&self, _limit: usize) -> ApiFuture<'_, Vec<Task>> {
        Self::fail("list_recent_tasks")
    }
    fn get_task(&self, _id: TaskId) -> ApiFuture<'_, Task> {
        Self::fail("get_task")
    }
    fn list_tasks_by_status(&self, _status: TaskStatus) -> ApiFuture<'_, Vec<Task>> {
        Self::fail("list_tasks_by_status")
    }
    fn cancel_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Self::fail("cancel_task")
    }
    fn stop_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Self::fail("stop_task")
    }
    fn retry_task(&self, _id: TaskId) -> ApiFuture<'_, Task> {
        Self::fail("retry_task")
    }
    fn delete_task(&self, _id: TaskId) -> ApiFuture<'_, Acknowledgement> {
        Self::fail("delete_task")
    }
    fn statistics(&self) -> ApiFuture<'_, TaskStatistics> {
        Self::fail("statistics")
    }
    fn running_count(&self) -> ApiFuture<'_, RunningCount> {
        Self::fail("running_count")
    }
    fn system_status(&self) -> ApiFuture<'_, SystemStatus> {
        Self::fail("system_status")
    }
}
