//! fanout - Observer-pattern notification demos
//!
//! Runs the inventory, logger and newsletter scenarios and prints every
//! notification to stdout.

use anyhow::{bail, Result};
use clap::Parser;
use fanout::{cli::Cli, config::Config, core::Sink, outputs::ConsoleSink, scenarios};
use log::{error, info};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logger for this specific error
        env_logger::init();
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("fanout starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Scenario: {}", cli.scenario);
    match config.seed {
        Some(seed) => info!("Seed: {}", seed),
        None => info!("Seed: random"),
    }
    info!("Products: {}", config.inventory.product_count);
    info!("Max Stock: {}", config.inventory.max_stock);
    info!("Low Stock Margin: {}", config.inventory.low_stock_margin);
    info!("Validate Products: {}", config.inventory.validate_products);
    info!("Listed Products: {}", config.inventory.products.len());
    info!("Log Message Level: {}", config.logger.level);
    info!("-------------------------------------------------------");

    let sink: Arc<dyn Sink> = Arc::new(ConsoleSink::new());
    let reports = scenarios::run(cli.scenario, &config, sink)?;

    let failures: usize = reports.iter().map(|report| report.failures).sum();
    if failures > 0 {
        bail!("{} notifications could not be delivered", failures);
    }
    info!("fanout finished.");
    Ok(())
}
