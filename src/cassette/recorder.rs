//! Accumulates interactions and writes them as a cassette file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::format::{Cassette, Interaction};

/// Collects interactions for one port (or a whole session) in call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    base_url: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Creates a recorder that [`finish`](Self::finish)es into `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            base_url: base_url.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Appends an interaction; `seq` is assigned automatically.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Converts the recording into a cassette without touching disk.
    #[must_use]
    pub fn into_cassette(self, recorded_at: DateTime<Utc>) -> Cassette {
        Cassette {
            name: self.name,
            recorded_at,
            base_url: self.base_url,
            interactions: self.interactions,
        }
    }

    /// Writes the cassette file and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let path = self.path.clone();
        self.into_cassette(Utc::now()).save(&path)?;
        Ok(path)
    }
}
