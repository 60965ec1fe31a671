//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. The overriding arguments double as a `figment` provider so
//! they are merged on top of the file and environment configuration.

use clap::{Parser, ValueEnum};
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::fmt;
use std::path::PathBuf;

/// Which demo scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scenario {
    Inventory,
    Logger,
    Newsletter,
    #[default]
    All,
}

impl Scenario {
    /// True if running this selection runs `scenario`.
    pub fn includes(self, scenario: Scenario) -> bool {
        self == Scenario::All || self == scenario
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Inventory => "inventory",
            Scenario::Logger => "logger",
            Scenario::Newsletter => "newsletter",
            Scenario::All => "all",
        };
        f.write_str(name)
    }
}

/// Observer-pattern demos: inventory alerts, a multi-target logger and a
/// newsletter dispatcher.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scenario to run.
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,

    /// Seed for the random inventory data.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Logging level for diagnostics.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Number of random products in the inventory scenario.
    #[arg(long, value_name = "N")]
    pub products: Option<u32>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        if let Some(seed) = self.seed {
            dict.insert("seed".into(), Value::from(seed));
        }

        if let Some(products) = self.products {
            let mut inventory = Dict::new();
            inventory.insert("product_count".into(), Value::from(products));
            dict.insert("inventory".into(), Value::from(inventory));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
