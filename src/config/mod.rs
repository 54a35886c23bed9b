//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (name = value lines)
//!     → parser.rs (tolerant line matching, unknown keys dropped)
//!     → coercion.rs (raw string → typed ConfigValue)
//!     → validation.rs (Rule per parameter)
//!         → checks.rs (filesystem cross-checks)
//!             → discovery.rs (DRBD resource files)
//!     → configuration.rs (accumulated in file order, last value wins)
//!     → loader.rs (required/optional enforcement)
//!     → Configuration (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - The schema is a static table; there is no way to register parameters
//!   at runtime
//! - Every failure is a `ConfigError` value; only `lifecycle::startup`
//!   turns it into a process exit
//! - Cross-checks see the partially built configuration, so a parameter
//!   can depend on one that appeared earlier in the file

pub mod checks;
pub mod coercion;
pub mod configuration;
pub mod discovery;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod validation;

pub use checks::{CheckContext, CheckError};
pub use configuration::{Configuration, Role};
pub use loader::{load_config, load_config_str, ConfigError, LoadOptions};
pub use schema::{ConfigValue, ParamType, ParameterSpec, Schema};
pub use validation::{CompareOp, Rule, RuleViolation, Validate};
