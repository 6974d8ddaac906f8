//! `viewtask watch`: poll the recent window and statistics.

use std::io::Write;
use std::time::Duration;

use tracing::warn;

use super::{emit, locale, now};
use crate::actions::TaskActions;
use crate::commands::render;
use crate::format::{format_timestamp, status_text, Locale};
use crate::model::TaskStatus;

/// Refreshes every `interval` and prints the newest tasks, forever or for
/// `iterations` rounds. A failed refresh is reported and polling goes on.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn watch(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    limit: usize,
    interval: Duration,
    iterations: Option<u64>,
) -> Result<(), String> {
    let store = actions.store();
    let locale = locale(actions);
    let mut round = 0u64;
    loop {
        if iterations.is_some_and(|n| round >= n) {
            return Ok(());
        }
        if round > 0 {
            tokio::time::sleep(interval).await;
        }
        round += 1;
        let outcome = actions.refresh_all_tasks(limit).await;
        let at = now(actions);
        if outcome.success {
            let stats = store.statistics();
            emit(
                out,
                &format!(
                    "[{}] {} {} / {} {}\n",
                    format_timestamp(at),
                    status_text(TaskStatus::Running, locale),
                    store.running_tasks().len(),
                    total_label(locale),
                    stats.total_count
                ),
            )?;
            emit(out, &render::task_table(&store.recent_tasks(), locale, at))?;
        } else {
            let message = outcome.message.unwrap_or_default();
            warn!(round, error = %message, "refresh failed");
            emit(out, &format!("[{}] {message}\n", format_timestamp(at)))?;
            store.clear_error();
        }
    }
}

fn total_label(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhTw => "總計",
        Locale::En => "total",
    }
}
