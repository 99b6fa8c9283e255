//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "QUERYLENS_LOG";

/// Filter used when `QUERYLENS_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "querylens=info";

/// Initialize the querylens tracing/logging system.
///
/// Reads `QUERYLENS_LOG` for per-crate log levels.
/// Format: `QUERYLENS_LOG=querylens_analysis=debug,querylens_cli=info`
///
/// Falls back to `querylens=info` if `QUERYLENS_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
