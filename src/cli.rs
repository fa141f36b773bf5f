//! Command-line interface for the ETL service.

use clap::{Parser, Subcommand};

/// Cryptocurrency analytics ETL service
#[derive(Parser)]
#[command(name = "crypto-etl")]
#[command(about = "CoinGecko to PostgreSQL ETL with an analytics API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Keep running the ETL at the configured interval instead of once
    #[arg(long)]
    pub continuous: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server together with the continuous ETL task
    Serve,
}
