//! calical - stateless iCalendar conversion worker
//!
//! Reads one JSON request per line on stdin and writes one JSON reply per line
//! on stdout. Logs go to stderr.
//!
//!   {"action":"get","events":[...]}  ->  {"ics":"BEGIN:VCALENDAR...","status":200}
//!   {"action":"put","ics":"..."}     ->  {"events":[...],"status":200}

use std::path::PathBuf;

use anyhow::{Context, Result};
use calical_core::Worker;
use calical_core::config::WorkerConfig;
use clap::Parser;
use tokio::io::{self, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calical")]
#[command(about = "Convert calendar events to and from iCalendar text over stdin/stdout")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: ~/.config/calical/config.toml if it exists)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides the config file (e.g. "debug", "calical_core=trace")
    #[arg(long)]
    log_level: Option<String>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("calical").join("config.toml"))
        .filter(|path| path.exists())
}

fn init_tracing(level: &str) {
    // RUST_LOG wins over config
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.or_else(default_config_path);
    let mut config = WorkerConfig::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config".to_string(),
    })?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level);
    tracing::info!(product_id = %config.product_id, "Starting calical worker");

    let worker = Worker::from_config(&config);
    let handled = worker
        .serve(BufReader::new(io::stdin()), io::stdout())
        .await
        .context("Failed to serve requests")?;

    tracing::info!(handled, "Input closed, shutting down");

    Ok(())
}
