//! Record-replay integration tests for the task store.
//!
//! 1. Script a cassette with `CassetteRecorder` and drive the store and
//!    actions through `ServiceContext::replaying()`.
//! 2. Record a session through the recording adapters, then replay the
//!    per-port cassettes it wrote and assert identical outcomes.

use std::path::Path;

use serde_json::{json, Value};

use viewtask::actions::TaskActions;
use viewtask::adapters::recording::{RecordingClock, RecordingTaskApi};
use viewtask::adapters::replaying::{ReplayingClock, ReplayingTaskApi};
use viewtask::cassette::config::CassetteConfig;
use viewtask::cassette::format::Cassette;
use viewtask::cassette::recorder::CassetteRecorder;
use viewtask::cassette::replayer::CassetteReplayer;
use viewtask::cassette::session::RecordingSession;
use viewtask::config::ClientConfig;
use viewtask::context::ServiceContext;
use viewtask::model::{TaskId, TaskStatus};
use viewtask::store::TaskStore;

fn task(id: u64, status: &str, completed: u64, created: &str) -> Value {
    json!({
        "id": id,
        "reelsUrl": "https://x/reel/1",
        "viewCount": 50,
        "completedCount": completed,
        "status": status,
        "createdAt": created,
    })
}

/// A morning's worth of interactions with the service.
fn script(path: &Path) -> CassetteRecorder {
    let mut recorder = CassetteRecorder::new(path, "lifecycle", "http://svc/api");
    let mut api = |method: &str, output: Value| {
        recorder.record("api", method, json!({}), json!({ "Ok": output }));
    };
    api("list_recent_tasks", json!([task(1, "RUNNING", 10, "2024-05-01T09:00:00")]));
    api("create_task", task(2, "PENDING", 0, "2024-05-01T10:00:00"));
    api("statistics", json!({"pendingCount": 1, "runningCount": 1}));
    api("create_task", task(3, "PENDING", 0, "2024-05-01T10:01:00"));
    api("statistics", json!({"pendingCount": 2, "runningCount": 1}));
    api("get_task", task(1, "RUNNING", 25, "2024-05-01T09:00:00"));
    api("cancel_task", json!({"message": "任務已取消"}));
    api("get_task", task(1, "CANCELLED", 25, "2024-05-01T09:00:00"));
    api("statistics", json!({"pendingCount": 2, "cancelledCount": 1}));
    recorder
}

/// Drives the store through the scripted session and returns what a user
/// would have seen.
async fn lifecycle(ctx: &ServiceContext) -> Vec<String> {
    let store = TaskStore::new(ctx);
    let actions = TaskActions::new(&store);
    let mut seen = Vec::new();

    let loaded = actions.load_recent_tasks(5).await.into_result().unwrap();
    assert!(store.recent_tasks().len() <= 5);
    seen.push(format!("loaded {}", loaded.len()));

    for _ in 0..2 {
        let outcome = actions.create_task("https://x/reel/1", 50).await;
        assert!(outcome.success);
        let created = outcome.data.unwrap();
        assert_eq!(created.status, TaskStatus::Pending);
        assert_eq!(created.completed_count, 0);
        assert_eq!(store.tasks()[0], created);
        seen.push(format!("created {}", created.id));
    }
    assert_eq!(store.tasks().len(), 3);

    let focused = actions.load_task(TaskId(1)).await.into_result().unwrap();
    let cached = store.tasks().into_iter().find(|t| t.id == TaskId(1)).unwrap();
    assert_eq!(store.current_task(), Some(cached));
    seen.push(format!("progress {}", focused.completed_count));

    let cancelled = actions.cancel_task(TaskId(1)).await;
    seen.push(cancelled.message.clone().unwrap_or_default());
    let cancelled = cancelled.into_result().unwrap();
    assert_eq!(cancelled.status, TaskStatus::Cancelled);
    assert_eq!(store.tasks()[2].status, TaskStatus::Cancelled);

    let stats = store.statistics();
    seen.push(format!("pending {} cancelled {}", stats.pending_count, stats.cancelled_count));
    assert!(!store.is_loading());
    assert!(store.error().is_none());
    seen
}

#[tokio::test]
async fn scripted_session_replays_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifecycle.cassette.yaml");
    script(&path).finish().unwrap();

    let ctx = ServiceContext::replaying(&path, ClientConfig::default()).unwrap();
    let seen = lifecycle(&ctx).await;
    assert_eq!(
        seen,
        [
            "loaded 1",
            "created 2",
            "created 3",
            "progress 25",
            "任務已取消",
            "pending 2 cancelled 1",
        ]
    );
}

#[tokio::test]
async fn recorded_session_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let source = script(&dir.path().join("unused.yaml")).into_cassette(chrono::Utc::now());
    let session_dir = dir.path().join("session");

    // --- Phase 1: record, with the scripted service standing in for the network ---
    let session = RecordingSession::new(&session_dir, "http://svc/api").unwrap();
    let recording = ServiceContext::new(
        Box::new(RecordingTaskApi::new(
            Box::new(ReplayingTaskApi::new(CassetteReplayer::new(&source))),
            session.api.clone(),
        )),
        Box::new(RecordingClock::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&source))),
            session.clock.clone(),
        )),
        ClientConfig::default(),
    );
    let recorded = lifecycle(&recording).await;
    drop(recording);
    session.finish().unwrap();

    let api = Cassette::load(&session_dir.join("api.cassette.yaml")).unwrap();
    assert_eq!(api.interactions.len(), source.interactions.len());
    assert_eq!(api.interactions[1].method, "create_task");
    assert_eq!(api.interactions[1].input["reelsUrl"], "https://x/reel/1");

    // --- Phase 2: replay the per-port cassettes twice ---
    for _ in 0..2 {
        let cassettes = CassetteConfig::from_session_dir(&session_dir);
        let ctx = ServiceContext::replaying_from(&cassettes, ClientConfig::default()).unwrap();
        assert_eq!(lifecycle(&ctx).await, recorded);
    }
}
