//! Display text for statuses, progress and timestamps.
//!
//! Everything here is a pure function of its arguments; the current time is
//! passed in rather than read, so callers decide which [`Clock`] it comes from.
//!
//! [`Clock`]: crate::ports::clock::Clock

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::model::TaskStatus;

/// Language for labels and messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Traditional Chinese, the default.
    #[default]
    ZhTw,
    /// English.
    En,
}

impl Locale {
    /// Tag used by `--locale` and `VIEWTASK_LOCALE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZhTw => "zh-TW",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" => Ok(Self::ZhTw),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(format!("unknown locale '{s}' (expected zh-TW or en)")),
        }
    }
}

/// Localized label for a status.
#[must_use]
pub const fn status_text(status: TaskStatus, locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => match status {
            TaskStatus::Pending => "等待中",
            TaskStatus::Running => "執行中",
            TaskStatus::Completed => "已完成",
            TaskStatus::Failed => "失敗",
            TaskStatus::Cancelled => "已取消",
            TaskStatus::Unknown => "未知狀態",
        },
        Locale::En => match status {
            TaskStatus::Pending => "Pending",
            TaskStatus::Running => "Running",
            TaskStatus::Completed => "Completed",
            TaskStatus::Failed => "Failed",
            TaskStatus::Cancelled => "Cancelled",
            TaskStatus::Unknown => "Unknown",
        },
    }
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Waiting on something.
    Warning,
    /// Active.
    Primary,
    /// Finished well.
    Success,
    /// Finished badly.
    Danger,
    /// Neutral.
    Info,
}

impl Severity {
    /// The tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Primary => "primary",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag for a status.
#[must_use]
pub const fn status_severity(status: TaskStatus) -> Severity {
    match status {
        TaskStatus::Pending => Severity::Warning,
        TaskStatus::Running => Severity::Primary,
        TaskStatus::Completed => Severity::Success,
        TaskStatus::Failed => Severity::Danger,
        TaskStatus::Cancelled | TaskStatus::Unknown => Severity::Info,
    }
}

/// Whole-number completion percentage, rounded half up; `0` when nothing was
/// requested.
#[must_use]
pub fn format_progress(completed: u64, view_count: u64) -> u64 {
    if view_count == 0 {
        return 0;
    }
    let (completed, view_count) = (u128::from(completed), u128::from(view_count));
    let percent = (completed * 200 + view_count) / (view_count * 2);
    u64::try_from(percent).unwrap_or(u64::MAX)
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Coarse time since `ts`: "3 分鐘前", "2 hours ago". Future times read as
/// just now.
#[must_use]
pub fn format_elapsed(ts: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let seconds = (now - ts).num_seconds().max(0);
    let (amount, zh, en) = match seconds {
        0..=59 => {
            return match locale {
                Locale::ZhTw => "剛剛".to_string(),
                Locale::En => "just now".to_string(),
            };
        }
        60..=3_599 => (seconds / 60, "分鐘", "minute"),
        3_600..=86_399 => (seconds / 3_600, "小時", "hour"),
        _ => (seconds / 86_400, "天", "day"),
    };
    match locale {
        Locale::ZhTw => format!("{amount} {zh}前"),
        Locale::En if amount == 1 => format!("1 {en} ago"),
        Locale::En => format!("{amount} {en}s ago"),
    }
}

/// Wall time between two instants: `1h 02m 03s`, `4m 05s`, `9s`.
#[must_use]
pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let total = (end - start).num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3_600, total % 3_600 / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// A mutation whose success is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A task was created.
    Create,
    /// A task was cancelled.
    Cancel,
    /// A running task was stopped.
    Stop,
    /// A task was restarted.
    Retry,
    /// A task was removed.
    Delete,
}

/// Localized success message for an action.
#[must_use]
pub const fn action_message(action: Action, locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => match action {
            Action::Create => "任務建立成功",
            Action::Cancel => "任務已取消",
            Action::Stop => "任務已停止",
            Action::Retry => "任務已重新開始",
            Action::Delete => "任務已刪除",
        },
        Locale::En => match action {
            Action::Create => "Task created",
            Action::Cancel => "Task cancelled",
            Action::Stop => "Task stopped",
            Action::Retry => "Task restarted",
            Action::Delete => "Task deleted",
        },
    }
}
