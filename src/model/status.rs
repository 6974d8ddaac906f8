//! Task lifecycle status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote view task.
///
/// `Unknown` absorbs statuses added server-side after this client was built;
/// it is never produced locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Accepted but not yet picked up by a worker.
    #[serde(alias = "pending")]
    Pending,
    /// Being worked on; `completed_count` may still grow.
    #[serde(alias = "running")]
    Running,
    /// Finished successfully.
    #[serde(alias = "completed")]
    Completed,
    /// Finished with an error; progress is frozen where it stopped.
    #[serde(alias = "failed")]
    Failed,
    /// Stopped on request before finishing.
    #[serde(alias = "cancelled", alias = "stopped")]
    Cancelled,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Every status the server is known to emit, in lifecycle order.
    pub const KNOWN: [Self; 5] =
        [Self::Pending, Self::Running, Self::Completed, Self::Failed, Self::Cancelled];

    /// Whether no further transitions happen without an explicit retry.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// The wire spelling used in paths such as `/tasks/status/{status}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown task status '{s}' (expected one of: pending, running, completed, \
                     failed, cancelled)"
                )
            })
    }
}
