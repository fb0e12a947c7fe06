//! Diagnostic logging for the binary.
//!
//! The library only emits `tracing` events; the binary installs a stderr
//! subscriber filtered by `LINGCAT_LOG` (an `EnvFilter` directive string).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "LINGCAT_LOG";

/// Directive used when `LINGCAT_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "error" }
}

/// Install the global subscriber. Does nothing if one is already set.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(colored::control::SHOULD_COLORIZE.should_colorize())
                .without_time()
                .with_target(false),
        )
        .try_init();
}
