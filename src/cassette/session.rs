//! A recording session: one recorder per port, written together.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::recorder::CassetteRecorder;

/// Per-port recorders writing into one directory.
///
/// Started by setting `VIEWTASK_RECORD=<dir>`; produces
/// `<dir>/api.cassette.yaml` and `<dir>/clock.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for task service interactions.
    pub api: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock readings.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates `dir` (if needed) and the per-port recorders.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or already holds
    /// a recording.
    pub fn new(dir: &Path, base_url: &str) -> Result<Self, String> {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create cassette directory {}: {e}", dir.display()))?;
        if dir.join("api.cassette.yaml").exists() {
            return Err(format!("Cassette directory already holds a recording: {}", dir.display()));
        }

        let make_recorder = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("viewtask-{port}"), base_url)))
        };

        Ok(Self {
            api: make_recorder("api"),
            clock: make_recorder("clock"),
            output_dir: dir.into(),
        })
    }

    /// Writes every port's cassette and returns the output directory.
    ///
    /// The adapters holding the recorders must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish()?;
            Ok(())
        }

        finish_one(self.api, "api")?;
        finish_one(self.clock, "clock")?;
        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use serde_json::json;

    #[test]
    fn writes_one_file_per_port() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path(), "http://svc/api").unwrap();
        session.api.lock().unwrap().record("api", "list_tasks", json!({}), json!({"Ok": []}));

        let out = session.finish().unwrap();
        assert_eq!(out, dir.path());

        let api = Cassette::load(&dir.path().join("api.cassette.yaml")).unwrap();
        assert_eq!(api.interactions.len(), 1);
        assert_eq!(api.base_url, "http://svc/api");
        let clock = Cassette::load(&dir.path().join("clock.cassette.yaml")).unwrap();
        assert!(clock.interactions.is_empty());
    }

    #[test]
    fn refuses_to_overwrite_a_recording() {
        let dir = tempfile::tempdir().unwrap();
        RecordingSession::new(dir.path(), "http://svc/api").unwrap().finish().unwrap();
        assert!(RecordingSession::new(dir.path(), "http://svc/api").is_err());
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_a_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path(), "http://svc/api").unwrap();
        let _held = Arc::clone(&session.api);
        let err = session.finish().unwrap_err();
        assert!(err.contains("still has references"));
    }
}
