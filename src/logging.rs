//! Tracing initialization
//!
//! Logs go to stderr so stdout stays clean for JSON and SVG output.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-module log levels, e.g. `KANO_LOG=kano=debug`
pub const LOG_ENV: &str = "KANO_LOG";

/// Initialize the subscriber once. `verbose` raises the fallback level to
/// debug when `KANO_LOG` is unset or invalid.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { "kano=debug" } else { "kano=warn" };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
