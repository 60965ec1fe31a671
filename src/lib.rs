//! fanout - Observer-pattern notification demos
//!
//! This library provides a generic, identity-keyed subscriber registry and
//! three publishers built on it: inventory stock alerts, a multi-target
//! logger and a newsletter dispatcher.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod inventory;
pub mod logger;
pub mod newsletter;
pub mod outputs;
pub mod registry;
pub mod scenarios;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export core types for convenience
pub use crate::core::{Sink, Subscriber};
pub use error::{BroadcastError, DeliveryFailure, ScenarioError, ValidationError};
pub use registry::{Registry, SubscriberId};
