//! Where replayed interactions come from.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path are unconfigured and
/// panic when called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the task service port.
    pub api: Option<PathBuf>,
    /// Cassette for the clock port.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the task service port.
    pub api: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Uses the same file for every port, as written by a single-file recording.
    #[must_use]
    pub fn monolithic(path: &Path) -> Self {
        Self { api: Some(path.to_path_buf()), clock: Some(path.to_path_buf()) }
    }

    /// Uses `<dir>/api.cassette.yaml` and `<dir>/clock.cassette.yaml`, the
    /// layout a [`RecordingSession`](super::session::RecordingSession) writes.
    /// Missing files leave their port unconfigured.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self { api: existing("api"), clock: existing("clock") }
    }

    /// Loads every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Path| Cassette::load(path).map(|c| CassetteReplayer::new(&c));
        Ok(PortReplayers {
            api: self.api.as_deref().map(load).transpose()?,
            clock: self.clock.as_deref().map(load).transpose()?,
        })
    }
}
