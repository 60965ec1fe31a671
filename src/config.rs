//! Configuration management for fanout
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer, from lowest to highest priority: built-in
//! defaults, a `fanout.toml` file, `FANOUT_`-prefixed environment variables
//! and command-line arguments.

use crate::cli::Cli;
use crate::logger::LogLevel;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file read when `--config` is not given. A missing file is
/// not an error.
pub const DEFAULT_CONFIG_PATH: &str = "fanout.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for diagnostics (stderr).
    pub log_level: String,
    /// Seed for the random inventory data. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Configuration for the inventory scenario.
    pub inventory: InventoryConfig,
    /// Configuration for the logger scenario.
    pub logger: LoggerConfig,
    /// Configuration for the newsletter scenario.
    pub newsletter: NewsletterConfig,
}

/// Configuration for the inventory scenario.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InventoryConfig {
    /// How many random products to run through a tracker.
    pub product_count: u32,
    /// Upper bound for the random stock and critical stock values.
    pub max_stock: i64,
    /// Units above the critical level that still count as low stock.
    /// Zero disables the low-stock notification.
    pub low_stock_margin: i64,
    /// Reject products with negative values or empty names.
    pub validate_products: bool,
    /// Fixed products to run instead of random ones. When non-empty,
    /// `product_count` and `max_stock` are ignored.
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// A product listed in the configuration file. Ids are assigned from 1 in
/// list order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProductConfig {
    pub name: String,
    pub stock: i64,
    pub critical_stock: i64,
}

/// Configuration for the logger scenario.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub message: String,
}

/// Configuration for the newsletter scenario.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NewsletterConfig {
    /// Sent while all three subscribers are registered.
    pub first_headline: String,
    /// Sent after the SMS subscriber has been removed.
    pub second_headline: String,
}

impl Config {
    /// Loads the application configuration.
    ///
    /// # Arguments
    /// * `cli` - Parsed command-line arguments; supplies the config file path
    ///   and the highest-priority overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // e.g. FANOUT_LOG_LEVEL=debug, FANOUT_INVENTORY__PRODUCT_COUNT=5
            .merge(Env::prefixed("FANOUT_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
            inventory: InventoryConfig {
                product_count: 3,
                max_stock: 100,
                low_stock_margin: 0,
                validate_products: false,
                products: Vec::new(),
            },
            logger: LoggerConfig {
                level: LogLevel::Info,
                message: "The logging system is now live!".to_string(),
            },
            newsletter: NewsletterConfig {
                first_headline: "Breaking News! All three subscribers get the news!".to_string(),
                second_headline: "Another breaking news! Only two subscribers left!".to_string(),
            },
        }
    }
}
