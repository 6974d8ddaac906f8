//! `viewtask stats` and `viewtask system`.

use std::io::Write;

use super::{emit, locale};
use crate::actions::TaskActions;
use crate::commands::render;
use crate::format::Locale;

/// Prints server-wide task counts.
///
/// # Errors
///
/// Returns an error if the statistics are unavailable or output fails.
pub async fn stats(actions: &TaskActions<'_, '_>, out: &mut impl Write) -> Result<(), String> {
    let statistics = actions.load_statistics().await.into_result()?;
    emit(out, &render::statistics(&statistics, locale(actions)))
}

/// Prints the running-task count and the service's health report.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn system(actions: &TaskActions<'_, '_>, out: &mut impl Write) -> Result<(), String> {
    let running = actions.fetch_running_count().await.into_result()?;
    let status = actions.fetch_system_status().await.into_result()?;
    let label = match locale(actions) {
        Locale::ZhTw => "執行中任務",
        Locale::En => "Running tasks",
    };
    emit(out, &format!("{label}: {running}\n{}\n", render::system_status(&status)))
}
