//! `viewtask cancel`, `stop`, `retry` and `delete`.

use std::io::Write;

use super::{emit, locale, now};
use crate::actions::{ActionOutcome, TaskActions};
use crate::commands::render;
use crate::model::{Task, TaskId};

/// A transition applied to one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Cancel the task.
    Cancel,
    /// Stop the running task.
    Stop,
    /// Restart the task.
    Retry,
}

/// Applies `control` to task `id` and prints the resulting record.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn transition(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    control: Control,
    id: TaskId,
) -> Result<(), String> {
    let outcome: ActionOutcome<Task> = match control {
        Control::Cancel => actions.cancel_task(id).await,
        Control::Stop => actions.stop_task(id).await,
        Control::Retry => actions.retry_task(id).await,
    };
    let message = outcome.message.clone();
    let task = outcome.into_result()?;
    if let Some(message) = message {
        emit(out, &format!("{message}\n"))?;
    }
    emit(out, &render::task_detail(&task, locale(actions), now(actions)))
}

/// Deletes task `id`.
///
/// # Errors
///
/// Returns the service's error message, or an error if output fails.
pub async fn delete(
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
    id: TaskId,
) -> Result<(), String> {
    let outcome = actions.delete_task(id).await;
    let message = outcome.message.clone();
    outcome.into_result()?;
    emit(out, &format!("{}\n", message.unwrap_or_default()))
}
