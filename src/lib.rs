//! Core library entry for the `viewtask` CLI.
//!
//! The heart of the crate is [`store::TaskStore`], the client-side copy of
//! remote view-task state, and [`actions::TaskActions`], which drives it and
//! reports every outcome in one shape. The service is reached through the
//! [`ports::task_api::TaskApi`] port, with live, recording and replaying
//! adapters bundled by [`context::ServiceContext`].

pub mod actions;
pub mod adapters;
pub mod api;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod format;
pub mod logging;
pub mod model;
pub mod ports;
pub mod store;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| format!("Failed to print help: {e}"));
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init_tracing(cli.verbose, cli.quiet)?;
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["viewtask", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["viewtask", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_missing_arguments() {
        let err = run(["viewtask", "create"]).unwrap_err();
        assert!(err.contains("<URL>"));
    }
}
