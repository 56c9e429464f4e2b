//! Command-line arguments of the demo binary.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tidings-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runs a small store simulation on top of a tidings dispatcher")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); `tidings.*` in the working directory when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of orders to simulate; overrides `orders` from the configuration
    #[arg(short, long)]
    pub orders: Option<u32>,

    /// Log level; overrides `logger.level` from the configuration
    #[arg(short, long)]
    pub level: Option<String>,
}
