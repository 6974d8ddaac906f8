//! Command dispatch and handlers.

pub mod control;
pub mod render;
pub mod stats;
pub mod tasks;
pub mod watch;

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::actions::TaskActions;
use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::ClientConfig;
use crate::context::ServiceContext;
use crate::format::Locale;
use crate::store::TaskStore;

use control::Control;

/// Dispatch a parsed command line to its handler.
///
/// When `VIEWTASK_REPLAY` names a cassette file, every port is served from
/// it. Otherwise, when `VIEWTASK_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = ClientConfig::from_env()?.with_overrides(cli.api_url.as_deref(), cli.locale)?;

    let (ctx, session) = if let Ok(path) = env::var("VIEWTASK_REPLAY") {
        (ServiceContext::replaying(Path::new(&path), config)?, None)
    } else if let Ok(dir) = env::var("VIEWTASK_RECORD") {
        let session = RecordingSession::new(Path::new(&dir), &config.base_url)?;
        (ServiceContext::recording(config, &session)?, Some(session))
    } else {
        (ServiceContext::live(config)?, None)
    };

    let result = run_with_context(&cli.command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Run a command against `ctx` on a fresh current-thread runtime, printing
/// to stdout.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the command fails.
pub fn run_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let store = TaskStore::new(ctx);
    let actions = TaskActions::new(&store);
    let mut out = io::stdout().lock();
    runtime.block_on(execute(command, &actions, &mut out))
}

/// Run one command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub async fn execute(
    command: &Command,
    actions: &TaskActions<'_, '_>,
    out: &mut impl Write,
) -> Result<(), String> {
    let config = &actions.store().context().config;
    match command {
        Command::Create { url, view_count } => tasks::create(actions, out, url, *view_count).await,
        Command::List { status } => tasks::list(actions, out, *status).await,
        Command::Recent { limit } => {
            tasks::recent(actions, out, limit.unwrap_or(config.recent_limit)).await
        }
        Command::Show { id } => tasks::show(actions, out, *id).await,
        Command::Cancel { id } => control::transition(actions, out, Control::Cancel, *id).await,
        Command::Stop { id } => control::transition(actions, out, Control::Stop, *id).await,
        Command::Retry { id } => control::transition(actions, out, Control::Retry, *id).await,
        Command::Delete { id } => control::delete(actions, out, *id).await,
        Command::Stats => stats::stats(actions, out).await,
        Command::System => stats::system(actions, out).await,
        Command::Watch { interval, iterations } => {
            let interval = Duration::from_secs(*interval);
            watch::watch(actions, out, config.recent_limit, interval, *iterations).await
        }
    }
}

fn locale(actions: &TaskActions<'_, '_>) -> Locale {
    actions.store().context().config.locale
}

fn now(actions: &TaskActions<'_, '_>) -> DateTime<Utc> {
    actions.store().context().clock.now()
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), String> {
    out.write_all(text.as_bytes()).map_err(|e| format!("Failed to write output: {e}"))
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
