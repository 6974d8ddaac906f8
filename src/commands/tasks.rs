//! `viewtask create`, `list`, `recent` and `show`.

use std::io::Write;

use super::{emit, locale, now};
use crate::actions::TaskActions;
use crate::commands::render;
use crate::model::{TaskId, TaskStatus};

/// Submits a task and prints it.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn create(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    url: &str,
    view_count: u64,
) -> Result<(), String> {
    let outcome = actions.create_task(url, view_count).await;
    let message = outcome.message.clone();
    let task = outcome.into_result()?;
    if let Some(message) = message {
        emit(out, &format!("{message}\n"))?;
    }
    emit(out, &render::task_detail(&task, locale(actions), now(actions)))
}

/// Prints every task, or those with `status`.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn list(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    status: Option<TaskStatus>,
) -> Result<(), String> {
    let tasks = match status {
        Some(status) => actions.fetch_tasks_by_status(status).await,
        None => actions.load_tasks().await,
    }
    .into_result()?;
    emit(out, &render::task_table(&tasks, locale(actions), now(actions)))
}

/// Prints the `limit` most recent tasks.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn recent(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    limit: usize,
) -> Result<(), String> {
    let tasks = actions.load_recent_tasks(limit).await.into_result()?;
    emit(out, &render::task_table(&tasks, locale(actions), now(actions)))
}

/// Prints one task in detail.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn show(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    id: TaskId,
) -> Result<(), String> {
    let task = actions.load_task(id).await.into_result()?;
    emit(out, &render::task_detail(&task, locale(actions), now(actions)))
}
