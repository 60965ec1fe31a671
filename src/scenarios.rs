//! Scenario drivers.
//!
//! Each driver builds its publisher and subscribers locally, triggers the
//! publish step and returns a [`ScenarioReport`]. Failed deliveries are logged
//! and counted; they never abort a run.

use crate::cli::Scenario;
use crate::config::{Config, InventoryConfig, LoggerConfig, NewsletterConfig};
use crate::core::Sink;
use crate::error::{BroadcastError, ScenarioError};
use crate::inventory::{
    InventoryTracker, ManagerSmsNotifier, Product, PurchasingDepartmentNotifier, StockNotifier,
    SupplierEmailNotifier, WebsiteUpdater,
};
use crate::logger::{ConsoleLogger, FileLogger, LogMessage, Logger};
use crate::newsletter::{EmailSubscriber, NewsAgency, SmsSubscriber, WebhookSubscriber};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// What a scenario run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    /// Number of broadcasts triggered.
    pub broadcasts: usize,
    /// Successful subscriber deliveries across all broadcasts.
    pub deliveries: usize,
    /// Failed subscriber deliveries across all broadcasts.
    pub failures: usize,
}

impl ScenarioReport {
    fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            broadcasts: 0,
            deliveries: 0,
            failures: 0,
        }
    }

    fn record(&mut self, result: Result<usize, BroadcastError>) {
        self.broadcasts += 1;
        match result {
            Ok(delivered) => self.deliveries += delivered,
            Err(e) => {
                warn!("{} scenario: {}", self.scenario, e);
                self.deliveries += e.delivered;
                self.failures += e.failures.len();
            }
        }
    }
}

/// Creates the random source for the inventory data.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Runs the selected scenarios in order and returns one report per scenario.
pub fn run(
    selection: Scenario,
    config: &Config,
    sink: Arc<dyn Sink>,
) -> Result<Vec<ScenarioReport>, ScenarioError> {
    let mut rng = build_rng(config.seed);
    let mut reports = Vec::new();
    if selection.includes(Scenario::Inventory) {
        info!("Running {} scenario", Scenario::Inventory);
        let report = run_inventory(&config.inventory, &mut rng, Arc::clone(&sink))?;
        reports.push(log_summary(report));
    }
    if selection.includes(Scenario::Logger) {
        info!("Running {} scenario", Scenario::Logger);
        reports.push(log_summary(run_logger(&config.logger, Arc::clone(&sink))));
    }
    if selection.includes(Scenario::Newsletter) {
        info!("Running {} scenario", Scenario::Newsletter);
        reports.push(log_summary(run_newsletter(&config.newsletter, sink)));
    }
    Ok(reports)
}

fn log_summary(report: ScenarioReport) -> ScenarioReport {
    info!(
        "{} scenario finished: {} broadcasts, {} deliveries, {} failures",
        report.scenario, report.broadcasts, report.deliveries, report.failures
    );
    report
}

/// Generates a product with random stock values in `0..=max_stock`.
///
/// A coin flip decides whether the critical level lands above the stock
/// (which triggers an alert) or at or below it.
pub fn random_product<R: Rng>(id: u32, max_stock: i64, rng: &mut R) -> Product {
    let stock = rng.random_range(0..=max_stock);
    let critical_stock = if rng.random_bool(0.5) {
        rng.random_range(stock..=max_stock)
    } else {
        rng.random_range(0..=stock)
    };
    Product::new(id, format!("Product{}", id), stock, critical_stock)
}

/// Runs the configured products, or `product_count` random ones when none are
/// listed, through a fresh tracker each, with the same four notifiers
/// registered every time.
///
/// With `validate_products` set, every product is checked before the first
/// update is processed.
pub fn run_inventory<R: Rng>(
    config: &InventoryConfig,
    rng: &mut R,
    sink: Arc<dyn Sink>,
) -> Result<ScenarioReport, ScenarioError> {
    let products = inventory_products(config, rng)?;

    let notifiers: Vec<Arc<StockNotifier>> = vec![
        Arc::new(PurchasingDepartmentNotifier::new(Arc::clone(&sink))),
        Arc::new(SupplierEmailNotifier::new(Arc::clone(&sink))),
        Arc::new(WebsiteUpdater::new(Arc::clone(&sink))),
        Arc::new(ManagerSmsNotifier::new(sink)),
    ];

    let mut report = ScenarioReport::new(Scenario::Inventory);
    for product in &products {
        debug!(
            "Product {} '{}': stock {}, critical {}",
            product.id, product.name, product.stock, product.critical_stock
        );

        let tracker = InventoryTracker::with_low_stock_margin(config.low_stock_margin);
        for notifier in &notifiers {
            tracker.add_notifier(Arc::clone(notifier));
        }
        match tracker.process_stock_update(product) {
            Ok(Some(update)) => report.record(Ok(update.delivered)),
            Ok(None) => {}
            Err(e) => report.record(Err(e)),
        }
    }
    Ok(report)
}

fn inventory_products<R: Rng>(
    config: &InventoryConfig,
    rng: &mut R,
) -> Result<Vec<Product>, ScenarioError> {
    let products: Vec<Product> = if config.products.is_empty() {
        if config.max_stock < 0 {
            return Err(ScenarioError::InvalidConfig(format!(
                "inventory.max_stock must not be negative (got {})",
                config.max_stock
            )));
        }
        (1..=config.product_count)
            .map(|id| random_product(id, config.max_stock, rng))
            .collect()
    } else {
        (1..)
            .zip(&config.products)
            .map(|(id, p)| Product::new(id, p.name.clone(), p.stock, p.critical_stock))
            .collect()
    };

    if !config.validate_products {
        return Ok(products);
    }
    products
        .into_iter()
        .map(|p| Product::validated(p.id, p.name, p.stock, p.critical_stock))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ScenarioError::from)
}

/// Sends one message through a logger with a file and a console target.
pub fn run_logger(config: &LoggerConfig, sink: Arc<dyn Sink>) -> ScenarioReport {
    let logger = Logger::new();
    logger.add_target(Arc::new(FileLogger::new(Arc::clone(&sink))));
    logger.add_target(Arc::new(ConsoleLogger::new(sink)));

    let mut report = ScenarioReport::new(Scenario::Logger);
    let message = LogMessage::new(config.level, config.message.clone());
    report.record(logger.send(&message));
    report
}

/// Sends the first headline to three subscribers, drops the SMS subscriber
/// and sends the second headline to the remaining two.
pub fn run_newsletter(config: &NewsletterConfig, sink: Arc<dyn Sink>) -> ScenarioReport {
    let agency = NewsAgency::new();
    let sms = Arc::new(SmsSubscriber::new(Arc::clone(&sink)));
    agency.add_subscriber(sms.clone());
    agency.add_subscriber(Arc::new(EmailSubscriber::new(Arc::clone(&sink))));
    agency.add_subscriber(Arc::new(WebhookSubscriber::new(sink)));

    let mut report = ScenarioReport::new(Scenario::Newsletter);
    report.record(agency.notify(&config.first_headline));
    agency.remove_subscriber(&sms);
    report.record(agency.notify(&config.second_headline));
    report
}
