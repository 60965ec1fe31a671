//! Error types shared by the registry, the publishers and the scenario drivers.

use crate::registry::SubscriberId;
use thiserror::Error;

/// Rejected entity input.
///
/// Only raised by the validating constructors; the plain constructors accept
/// any value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product {id} has negative stock ({stock})")]
    NegativeStock { id: u32, stock: i64 },

    #[error("product {id} has a negative critical stock level ({critical_stock})")]
    NegativeCriticalStock { id: u32, critical_stock: i64 },

    #[error("product {id} has an empty name")]
    EmptyName { id: u32 },
}

/// A single subscriber that failed to receive a broadcast.
#[derive(Error, Debug)]
#[error("subscriber '{subscriber}' ({id}) failed: {source}")]
pub struct DeliveryFailure {
    pub id: SubscriberId,
    pub subscriber: String,
    #[source]
    pub source: anyhow::Error,
}

/// Aggregated result of a broadcast in which at least one subscriber failed.
///
/// Every subscriber in the broadcast snapshot was still invoked.
#[derive(Error, Debug)]
#[error("{} of {} subscribers failed to receive the broadcast", .failures.len(), .delivered + .failures.len())]
pub struct BroadcastError {
    /// Number of subscribers that received the payload successfully.
    pub delivered: usize,
    /// Failures in broadcast order.
    pub failures: Vec<DeliveryFailure>,
}

/// Errors that stop a scenario run.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
