//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → hand Configuration to the daemon
//!     any ConfigError → one line on stderr → exit(1)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Exactly one place in the crate terminates the process

pub mod startup;
