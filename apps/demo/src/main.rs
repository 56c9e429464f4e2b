mod cli;
mod config;
mod simulation;

use anyhow::Context;
use clap::Parser;
use tidings::logger::Logger;
use tidings::{Dispatcher, Scope};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::load_config;
use crate::simulation::Store;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(level) = cli.level {
        cfg.logger.level = level;
    }
    let orders = cli.orders.unwrap_or(cfg.orders);

    let _log = Logger::init(cfg.logger).context("Failed to initialize logging")?;

    let dispatcher = Dispatcher::<Store>::builder()
        .config(cfg.dispatcher)
        .on_failure(|failure| {
            warn!(subscription = %failure.subscription, kind = %failure.kind, "Listener failure observed");
        })
        .build()
        .context("Invalid dispatcher configuration")?;

    let root = Scope::named("app");
    root.provide(dispatcher);

    let summary = simulation::run(&root, orders).context("Store simulation could not start")?;
    info!(
        orders = summary.orders,
        items = summary.items,
        revenue_cents = summary.revenue_cents,
        failures = summary.failures,
        "Simulation finished"
    );

    Ok(())
}
