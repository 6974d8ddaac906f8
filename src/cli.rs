//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand};

use crate::format::Locale;
use crate::model::{TaskId, TaskStatus};

/// Top-level CLI parser for `viewtask`.
#[derive(Debug, Parser)]
#[command(name = "viewtask", version, about = "Submit and track view tasks")]
pub struct Cli {
    /// More log output (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Less log output (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
    /// Service root, e.g. `http://localhost:8080/api`.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
    /// Label language: `zh-TW` or `en`.
    #[arg(long, global = true)]
    pub locale: Option<Locale>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new task.
    Create {
        /// Resource the views are directed at.
        url: String,
        /// Requested number of views.
        view_count: u64,
    },
    /// List every task, or only those with one status.
    List {
        /// Only tasks with this status.
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// List the most recent tasks.
    Recent {
        /// How many tasks to fetch (defaults to the configured window).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one task in detail.
    Show {
        /// Task id.
        id: TaskId,
    },
    /// Cancel a task.
    Cancel {
        /// Task id.
        id: TaskId,
    },
    /// Stop a running task.
    Stop {
        /// Task id.
        id: TaskId,
    },
    /// Restart a task.
    Retry {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: TaskId,
    },
    /// Show server-wide task counts.
    Stats,
    /// Show the service's health report.
    System,
    /// Poll the recent window and statistics.
    Watch {
        /// Seconds between refreshes.
        #[arg(long, default_value_t = 5)]
        interval: u64,
        /// Stop after this many refreshes.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        iterations: Option<u64>,
    },
}
