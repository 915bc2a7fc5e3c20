//! Logging init: structured `tracing` events to stderr.
//!
//! Stdout is reserved for rendered verdicts, so logs never mix with them.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor config provides one.
pub const DEFAULT_FILTER: &str = "warn";

/// Picks the filter directive: `RUST_LOG`, then config, then [`DEFAULT_FILTER`].
pub fn filter_directive(rust_log: Option<String>, configured: Option<&str>) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            configured
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global stderr subscriber.
///
/// Returns `false` when a subscriber was already installed. An unparsable
/// directive falls back to [`DEFAULT_FILTER`] and is reported once installed.
pub fn init_logging(configured: Option<&str>) -> bool {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), configured);
    let (filter, rejected) = match EnvFilter::try_new(&directive) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(DEFAULT_FILTER), Some(error)),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if let Some(error) = rejected {
        tracing::warn!(%directive, %error, "invalid log filter, using default");
    }

    installed
}
