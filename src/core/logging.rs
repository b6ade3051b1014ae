//! Logging setup
//!
//! Logs go to stderr so stdout stays clean for `--json` output and the MCP
//! stdio transport.

use tracing_subscriber::EnvFilter;

/// Env var holding an `EnvFilter` directive string
pub const LOG_ENV: &str = "NUMTRIAD_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "numtriad=debug,warn"
    } else {
        "warn"
    }
}

/// Build the filter: `NUMTRIAD_LOG` wins, otherwise warn (debug with `-v`)
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("numtriad=debug"));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
    }
}
