//! Configuration parsing for the catalog CLI.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Catalog: a product catalog seeded into a fresh SQLite store on every run.
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Data directory for the SQLite database
    #[arg(short, long, env = "CATALOG_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Database file name inside the data directory
    #[arg(long, env = "CATALOG_DB_NAME", default_value = "basic-sample-db")]
    pub db_name: String,

    /// Artificial delay before seeding, in milliseconds
    #[arg(long, env = "CATALOG_SEED_DELAY_MS", default_value_t = 4000)]
    pub seed_delay_ms: u64,

    /// Size of the reader connection pool
    #[arg(long, env = "CATALOG_READER_POOL_SIZE", default_value_t = 4)]
    pub reader_pool_size: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CATALOG_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all products (default)
    List,
    /// Show one product and its comments
    Show {
        /// Product id
        id: i64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {s}")),
        }
    }
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_name)
    }

    /// The requested command, defaulting to `list`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List)
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            seed_delay_ms: 0,
            reader_pool_size: 2,
            log_level: "debug".into(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            db_name: "basic-sample-db".into(),
            seed_delay_ms: 4000,
            reader_pool_size: 4,
            log_level: "info".into(),
            output: OutputFormat::Text,
            command: None,
        }
    }
}
