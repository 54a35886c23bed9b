//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Report a fatal configuration error as one line on stderr
//! - Terminate the process with a non-zero status on failure
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Helpers below return `Result`; only `load_or_exit` exits

use crate::config::{load_config, ConfigError, Configuration, LoadOptions};

/// Exit status for any configuration failure.
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// Render an error as a single line.
pub fn diagnostic(err: &ConfigError) -> String {
    err.to_string().replace(['\n', '\r'], " ")
}

/// Load the configuration or terminate the process.
pub fn load_or_exit(options: &LoadOptions) -> Configuration {
    match load_config(options) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}
