//! Scripted service contexts for unit tests.

use chrono::Utc;
use serde_json::{json, Value};

use crate::adapters::replaying::{ReplayingClock, ReplayingTaskApi};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::ClientConfig;
use crate::context::ServiceContext;
use crate::model::Task;

/// JSON for a task the way the service sends it.
pub(crate) fn task_json(id: u64, status: &str, completed: u64, view: u64, created: &str) -> Value {
    json!({
        "id": id,
        "reelsUrl": format!("https://x/reel/{id}"),
        "viewCount": view,
        "completedCount": completed,
        "status": status,
        "createdAt": created,
    })
}

/// A parsed task; `created` is a zone-less timestamp.
pub(crate) fn task(id: u64, status: &str, completed: u64, view: u64, created: &str) -> Task {
    serde_json::from_value(task_json(id, status, completed, view, created)).unwrap()
}

/// Builds the cassette a test's service context replays.
pub(crate) struct Script {
    recorder: CassetteRecorder,
}

impl Script {
    pub(crate) fn new() -> Self {
        Self { recorder: CassetteRecorder::new("/dev/null", "script", "http://svc/api") }
    }

    /// The next `method` call succeeds with `value`.
    pub(crate) fn ok(mut self, method: &str, value: Value) -> Self {
        self.recorder.record("api", method, json!({}), json!({ "Ok": value }));
        self
    }

    /// The next `method` call fails with a server error.
    pub(crate) fn server_err(mut self, method: &str, status: u16, message: &str) -> Self {
        self.recorder.record(
            "api",
            method,
            json!({}),
            json!({ "Err": { "kind": "server", "message": message, "status": status } }),
        );
        self
    }

    /// The next `method` call fails without a response.
    pub(crate) fn transport_err(mut self, method: &str, message: &str) -> Self {
        self.recorder.record(
            "api",
            method,
            json!({}),
            json!({ "Err": { "kind": "transport", "message": message } }),
        );
        self
    }

    /// The next clock reading.
    pub(crate) fn now(mut self, ts: &str) -> Self {
        self.recorder.record("clock", "now", json!({}), json!(ts));
        self
    }

    pub(crate) fn context(self) -> ServiceContext {
        self.context_with(ClientConfig::default())
    }

    pub(crate) fn context_with(self, config: ClientConfig) -> ServiceContext {
        let cassette = self.recorder.into_cassette(Utc::now());
        ServiceContext::new(
            Box::new(ReplayingTaskApi::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            config,
        )
    }
}
