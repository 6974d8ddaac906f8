//! Binary entrypoint for the `viewtask` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Replay and recording are selected in commands::dispatch via
    // VIEWTASK_REPLAY=<file> and VIEWTASK_RECORD=<dir>.
    match viewtask::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
