//! Failover cluster daemon configuration check (v1)
//!
//! Loads `/etc/failover.conf` (or the file given as the first argument),
//! validates every parameter against the built-in schema and the DRBD
//! resource directory (second argument, default `/etc/drbd.d`), and exits.
//!
//! # Architecture Overview
//!
//! ```text
//!   failover.conf ──▶ parser ──▶ coercion ──▶ validation ──▶ enforcement ──▶ Configuration
//!                                                 │
//!                                                 ▼
//!                                 checks (init.d, drbd.d, plugins/)
//! ```
//!
//! A successful run prints nothing unless `--show` is given. Any failure
//! prints one line on stderr and exits with status 1.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use failover::config::loader::{DEFAULT_CONFIG_FILE, DEFAULT_RESOURCE_DIR};
use failover::config::LoadOptions;
use failover::lifecycle::startup::load_or_exit;
use failover::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "failover")]
#[command(about = "Validate the failover cluster daemon configuration", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config_file: PathBuf,

    /// Directory holding DRBD resource definitions (*.res)
    #[arg(default_value = DEFAULT_RESOURCE_DIR)]
    resource_dir: PathBuf,

    /// Print the final parameter table
    #[arg(short, long)]
    show: bool,

    /// Output format for --show
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let options = LoadOptions::default()
        .with_config_file(&cli.config_file)
        .with_resource_dir(&cli.resource_dir);

    tracing::debug!(
        config_file = %options.config_file.display(),
        resource_dir = %options.resource_dir.display(),
        "Loading configuration"
    );

    let config = load_or_exit(&options);

    if cli.show {
        match cli.format {
            OutputFormat::Table => {
                println!();
                print!("{}", config.render_table());
                println!();
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        }
    }

    Ok(())
}
