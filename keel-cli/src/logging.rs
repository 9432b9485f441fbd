//! Logging setup for the `keel` binary.
//!
//! Logs go to stderr so they never mix with prompts and results on stdout.
//!
//! - `KEEL_LOG` - filter directives (e.g. `debug`, `keel_migrate=trace`)
//! - `-v/--verbose` - shorthand for `debug`

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "KEEL_LOG";

/// Level used when nothing is requested
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter for the given verbosity.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
