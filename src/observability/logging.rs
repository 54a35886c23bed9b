//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Map CLI verbosity to a stderr filter
//! - Optionally mirror everything at debug and above to a log file
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `FAILOVER_LOG` overrides the verbosity-derived stderr filter
//! - The file layer never uses ANSI colors

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding a stderr filter directive.
pub const LOG_ENV: &str = "FAILOVER_LOG";

/// Maps `-v` occurrences to a tracing directive.
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Calling this more than once keeps the first subscriber. Fails only if the
/// log file cannot be opened for appending.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> io::Result<()> {
    let stderr_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbosity >= 2)
        .with_filter(stderr_filter);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}
