//! Failover cluster daemon configuration library

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{load_config, ConfigError, Configuration, LoadOptions};
pub use lifecycle::startup::load_or_exit;
