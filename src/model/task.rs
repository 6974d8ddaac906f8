//! Task records mirrored from the remote service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::TaskStatus;
use super::timestamp;

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self).map_err(|e| format!("invalid task id '{s}': {e}"))
    }
}

/// One task as reported by the server.
///
/// Every field except `status`, `completed_count` and the lifecycle
/// timestamps is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// The resource the views are directed at.
    #[serde(rename = "reelsUrl", alias = "url")]
    pub url: String,
    /// Requested number of views.
    #[serde(alias = "targetViewCount", alias = "target_views")]
    pub view_count: u64,
    /// Views delivered so far.
    #[serde(default, alias = "completed_views")]
    pub completed_count: u64,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Creation time; the default ordering key.
    #[serde(with = "timestamp::required", alias = "created_at")]
    pub created_at: DateTime<Utc>,
    /// When a worker picked the task up.
    #[serde(default, with = "timestamp::optional", alias = "started_at")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the task reached a terminal status.
    #[serde(default, with = "timestamp::optional", alias = "completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Failure description supplied by the server.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "error_message")]
    pub error_message: Option<String>,
    /// Pacing profile chosen at creation.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "delay_type")]
    pub delay_type: Option<String>,
    /// Simulated interactions chosen at creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "simulate_actions")]
    pub simulate_actions: Vec<String>,
}

impl Task {
    /// Whether the task has reached a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// The resource the views are directed at.
    pub reels_url: String,
    /// Requested number of views.
    pub view_count: u64,
    /// Optional pacing profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_type: Option<String>,
    /// Optional simulated interactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub simulate_actions: Vec<String>,
}

impl CreateTaskRequest {
    /// A request with no delay or simulation configuration.
    #[must_use]
    pub fn new(url: impl Into<String>, view_count: u64) -> Self {
        Self { reels_url: url.into(), view_count, delay_type: None, simulate_actions: Vec::new() }
    }
}
