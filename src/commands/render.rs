//! Text rendering shared by the command handlers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::format::{
    format_duration, format_elapsed, format_progress, format_timestamp, status_severity,
    status_text, Locale,
};
use crate::model::{SystemStatus, Task, TaskStatistics, TaskStatus};

/// Localized "no tasks" line.
#[must_use]
pub fn no_tasks(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "沒有任務。",
        Locale::En => "No tasks.",
    }
}

fn progress_cell(task: &Task) -> String {
    format!(
        "{}/{} ({}%)",
        task.completed_count,
        task.view_count,
        format_progress(task.completed_count, task.view_count)
    )
}

/// One row per task: id, status, progress, age and URL.
#[must_use]
pub fn task_table(tasks: &[Task], locale: Locale, now: DateTime<Utc>) -> String {
    if tasks.is_empty() {
        return format!("{}\n", no_tasks(locale));
    }

    let rows: Vec<[String; 5]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.to_string(),
                status_text(task.status, locale).to_string(),
                progress_cell(task),
                format_elapsed(task.created_at, now, locale),
                task.url.clone(),
            ]
        })
        .collect();

    let headers = ["ID", "STATUS", "PROGRESS", "CREATED", "URL"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(line, "{cell}{}  ", " ".repeat(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Every field of one task.
#[must_use]
pub fn task_detail(task: &Task, locale: Locale, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task {}", task.id);
    let _ = writeln!(out, "URL:       {}", task.url);
    let _ = writeln!(
        out,
        "Status:    {} [{}]",
        status_text(task.status, locale),
        status_severity(task.status)
    );
    let _ = writeln!(out, "Progress:  {}", progress_cell(task));
    let _ = writeln!(
        out,
        "Created:   {} ({})",
        format_timestamp(task.created_at),
        format_elapsed(task.created_at, now, locale)
    );
    if let Some(started) = task.started_at {
        let _ = writeln!(out, "Started:   {}", format_timestamp(started));
        let end = task.completed_at.unwrap_or(now);
        let _ = writeln!(out, "Duration:  {}", format_duration(started, end));
    }
    if let Some(completed) = task.completed_at {
        let _ = writeln!(out, "Finished:  {}", format_timestamp(completed));
    }
    if let Some(delay) = &task.delay_type {
        let _ = writeln!(out, "Delay:     {delay}");
    }
    if !task.simulate_actions.is_empty() {
        let _ = writeln!(out, "Actions:   {}", task.simulate_actions.join(", "));
    }
    if let Some(message) = &task.error_message {
        let _ = writeln!(out, "Error:     {message}");
    }
    out
}

/// Per-status counts with localized labels.
#[must_use]
pub fn statistics(stats: &TaskStatistics, locale: Locale) -> String {
    let labels: Vec<(&str, u64)> = TaskStatus::KNOWN
        .into_iter()
        .map(|status| (status_text(status, locale), stats.count(status)))
        .chain(std::iter::once((
            match locale {
                Locale::ZhTw => "總計",
                Locale::En => "Total",
            },
            stats.total_count,
        )))
        .collect();
    let width = labels.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, count) in labels {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "{label}{}  {count}", " ".repeat(pad));
    }
    out
}

/// The health report as indented JSON.
#[must_use]
pub fn system_status(status: &SystemStatus) -> String {
    serde_json::to_string_pretty(&status.0).unwrap_or_else(|_| format!("{:?}", status.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::task;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 3, 0).unwrap()
    }

    #[test]
    fn table_aligns_columns() {
        let tasks = vec![
            task(7, "RUNNING", 12, 50, "2024-05-01T10:00:00"),
            task(12, "PENDING", 0, 5, "2024-05-01T10:02:30"),
        ];
        let table = task_table(&tasks, Locale::En, now());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID  STATUS   PROGRESS"));
        assert!(lines[2].starts_with("7   Running  12/50 (24%)  3 minutes ago"));
        assert!(lines[3].contains("just now"));
        assert!(lines[3].ends_with("https://x/reel/12"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(task_table(&[], Locale::ZhTw, now()), "沒有任務。\n");
    }

    #[test]
    fn detail_includes_duration_and_error() {
        let mut failed = task(3, "FAILED", 4, 10, "2024-05-01T09:00:00");
        failed.started_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        failed.completed_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 2, 3).unwrap());
        failed.error_message = Some("login wall".into());

        let detail = task_detail(&failed, Locale::ZhTw, now());
        assert!(detail.contains("Status:    失敗 [danger]"));
        assert!(detail.contains("Progress:  4/10 (40%)"));
        assert!(detail.contains("Duration:  1h 02m 03s"));
        assert!(detail.contains("Error:     login wall"));
    }

    #[test]
    fn statistics_lists_every_status_and_total() {
        let stats =
            TaskStatistics { running_count: 2, total_count: 2, ..TaskStatistics::default() };
        let text = statistics(&stats, Locale::En);
        assert!(text.contains("Running    2"));
        assert!(text.lines().last().unwrap().starts_with("Total"));
        assert_eq!(text.lines().count(), 6);
    }
}
