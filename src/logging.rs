//! Log subscriber setup for the binary.

use std::io::IsTerminal;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset, from repeated `-v`/`-q` flags.
#[must_use]
pub fn default_level(verbose: u8, quiet: u8) -> &'static str {
    match (verbose, quiet) {
        (_, q) if q >= 2 => "error",
        (_, 1) | (0, _) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` wins over the flags.
///
/// # Errors
///
/// Returns an error if the resulting filter does not parse.
pub fn init_tracing(verbose: u8, quiet: u8) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbose, quiet)))
        .map_err(|e| format!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pick_a_level() {
        assert_eq!(default_level(0, 0), "warn");
        assert_eq!(default_level(1, 0), "info");
        assert_eq!(default_level(2, 0), "debug");
        assert_eq!(default_level(5, 0), "trace");
        assert_eq!(default_level(3, 1), "warn");
        assert_eq!(default_level(0, 2), "error");
    }

    #[test]
    fn second_init_is_harmless() {
        init_tracing(0, 0).unwrap();
        init_tracing(2, 0).unwrap();
    }
}
