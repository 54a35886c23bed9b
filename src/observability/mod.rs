//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Loader stages produce:
//!     → logging.rs (structured log events via `tracing`)
//!
//! Consumers:
//!     → stderr (filtered by verbosity or FAILOVER_LOG)
//!     → optional log file (everything at debug and above)
//! ```
//!
//! # Design Decisions
//! - Fatal configuration errors do not go through logging; the subscriber
//!   may not be installed yet when they happen
//! - A successful load logs nothing at the default verbosity

pub mod logging;
