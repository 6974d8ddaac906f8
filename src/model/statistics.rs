//! Aggregate counts and service-level status payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::TaskStatus;
use super::task::Task;

/// Per-status task counts.
///
/// Fetched from `/tasks/statistics` for the whole remote population, or
/// computed over the local cache with [`TaskStatistics::from_tasks`]. The two
/// differ whenever the cache holds only a window of all tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStatistics", rename_all = "camelCase")]
pub struct TaskStatistics {
    /// Tasks waiting to start.
    pub pending_count: u64,
    /// Tasks in progress.
    pub running_count: u64,
    /// Tasks finished successfully.
    pub completed_count: u64,
    /// Tasks that failed.
    pub failed_count: u64,
    /// Tasks cancelled on request.
    pub cancelled_count: u64,
    /// All tasks, including any in statuses this client does not know.
    pub total_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatistics {
    #[serde(default, alias = "pending")]
    pending_count: u64,
    #[serde(default, alias = "running")]
    running_count: u64,
    #[serde(default, alias = "completed")]
    completed_count: u64,
    #[serde(default, alias = "failed")]
    failed_count: u64,
    #[serde(default, alias = "cancelled")]
    cancelled_count: u64,
    #[serde(default, alias = "total")]
    total_count: Option<u64>,
}

impl TryFrom<RawStatistics> for TaskStatistics {
    type Error = String;

    fn try_from(raw: RawStatistics) -> Result<Self, Self::Error> {
        let total_count = match raw.total_count {
            Some(total) => total,
            None => [raw.running_count, raw.completed_count, raw.failed_count, raw.cancelled_count]
                .into_iter()
                .try_fold(raw.pending_count, u64::checked_add)
                .ok_or("task counts overflow the total")?,
        };
        Ok(Self {
            pending_count: raw.pending_count,
            running_count: raw.running_count,
            completed_count: raw.completed_count,
            failed_count: raw.failed_count,
            cancelled_count: raw.cancelled_count,
            total_count,
        })
    }
}

impl TaskStatistics {
    /// Counts the given tasks by status.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self { total_count: tasks.len() as u64, ..Self::default() };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending_count += 1,
                TaskStatus::Running => stats.running_count += 1,
                TaskStatus::Completed => stats.completed_count += 1,
                TaskStatus::Failed => stats.failed_count += 1,
                TaskStatus::Cancelled => stats.cancelled_count += 1,
                TaskStatus::Unknown => {}
            }
        }
        stats
    }

    /// The count for one status; `Unknown` yields whatever the total does not
    /// account for.
    #[must_use]
    pub const fn count(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Pending => self.pending_count,
            TaskStatus::Running => self.running_count,
            TaskStatus::Completed => self.completed_count,
            TaskStatus::Failed => self.failed_count,
            TaskStatus::Cancelled => self.cancelled_count,
            TaskStatus::Unknown => self.total_count.saturating_sub(
                self.pending_count
                    .saturating_add(self.running_count)
                    .saturating_add(self.completed_count)
                    .saturating_add(self.failed_count)
                    .saturating_add(self.cancelled_count),
            ),
        }
    }
}

/// Body of `/tasks/running/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCount {
    /// Number of tasks currently running.
    pub count: u64,
}

/// Body of `/system/status`; its fields are service-defined and passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemStatus(pub Map<String, Value>);

impl SystemStatus {
    /// Looks up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Body returned by cancel, stop and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Server-supplied confirmation text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_defaults_to_sum_of_counts() {
        let stats: TaskStatistics = serde_json::from_value(json!({
            "pendingCount": 1,
            "runningCount": 2,
            "completedCount": 3,
            "failedCount": 0,
            "cancelledCount": 4
        }))
        .unwrap();
        assert_eq!(stats.total_count, 10);
    }

    #[test]
    fn explicit_total_wins() {
        let stats: TaskStatistics =
            serde_json::from_value(json!({"runningCount": 2, "totalCount": 9})).unwrap();
        assert_eq!(stats.total_count, 9);
        assert_eq!(stats.count(TaskStatus::Unknown), 7);
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        let err = serde_json::from_value::<TaskStatistics>(
            json!({"pendingCount": u64::MAX, "runningCount": 1}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn unknown_count_saturates() {
        let stats = TaskStatistics {
            pending_count: u64::MAX,
            running_count: 1,
            total_count: u64::MAX,
            ..TaskStatistics::default()
        };
        assert_eq!(stats.count(TaskStatus::Unknown), 0);
    }

    #[test]
    fn serialized_form_reads_back() {
        let stats =
            TaskStatistics { running_count: 1, total_count: 1, ..TaskStatistics::default() };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["runningCount"], json!(1));
        let back: TaskStatistics = serde_json::from_value(value).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn system_status_must_be_an_object() {
        assert!(serde_json::from_value::<SystemStatus>(json!({"pid": 1})).is_ok());
        assert!(serde_json::from_value::<SystemStatus>(json!([1, 2])).is_err());
    }
}
