//! Inventory stock alerts.
//!
//! An [`InventoryTracker`] classifies each stock update and, when the level is
//! worth reporting, broadcasts a [`StockNotification`] to its notifiers.

use crate::core::{Sink, Subscriber};
use crate::error::{BroadcastError, ValidationError};
use crate::registry::{Registry, SubscriberId};
use anyhow::Result;
use chrono::{DateTime, Local};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// A product whose stock level changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub stock: i64,
    pub critical_stock: i64,
}

impl Product {
    /// Creates a product without checking its values.
    pub fn new(id: u32, name: impl Into<String>, stock: i64, critical_stock: i64) -> Self {
        Self {
            id,
            name: name.into(),
            stock,
            critical_stock,
        }
    }

    /// Creates a product, rejecting negative stock levels and empty names.
    pub fn validated(
        id: u32,
        name: impl Into<String>,
        stock: i64,
        critical_stock: i64,
    ) -> Result<Self, ValidationError> {
        let product = Self::new(id, name, stock, critical_stock);
        if product.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { id });
        }
        if stock < 0 {
            return Err(ValidationError::NegativeStock { id, stock });
        }
        if critical_stock < 0 {
            return Err(ValidationError::NegativeCriticalStock { id, critical_stock });
        }
        Ok(product)
    }
}

/// How severe a stock update is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockLevel {
    CriticalStock,
    OutOfStock,
    LowStock,
}

impl StockLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::CriticalStock => "CRITICAL_STOCK",
            StockLevel::OutOfStock => "OUT_OF_STOCK",
            StockLevel::LowStock => "LOW_STOCK",
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified stock update, as delivered to notifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct StockNotification {
    pub product: Product,
    pub level: StockLevel,
    pub timestamp: DateTime<Local>,
}

impl StockNotification {
    /// Creates a notification stamped with the current local time.
    pub fn new(product: Product, level: StockLevel) -> Self {
        Self::with_timestamp(product, level, Local::now())
    }

    pub fn with_timestamp(product: Product, level: StockLevel, timestamp: DateTime<Local>) -> Self {
        Self {
            product,
            level,
            timestamp,
        }
    }

    /// Renders the human-readable message for this notification.
    pub fn message(&self) -> String {
        let product = &self.product;
        match self.level {
            StockLevel::CriticalStock => format!(
                "Product \"{}\" has reached critical stock level ({}/{})",
                product.name, product.stock, product.critical_stock
            ),
            StockLevel::LowStock => format!(
                "Product \"{}\" is running low on stock ({} remaining)",
                product.name, product.stock
            ),
            StockLevel::OutOfStock => format!("Product \"{}\" is out of stock", product.name),
        }
    }
}

/// Outcome of a stock update that was broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct StockUpdate {
    pub notification: StockNotification,
    /// Notifiers that received the notification.
    pub delivered: usize,
}

/// A subscriber to stock notifications.
pub type StockNotifier = dyn Subscriber<StockNotification>;

/// Classifies stock updates and broadcasts the ones worth reporting.
pub struct InventoryTracker {
    notifiers: Registry<StockNotification>,
    low_stock_margin: i64,
}

impl InventoryTracker {
    /// Creates a tracker that only reports out-of-stock and critical levels.
    pub fn new() -> Self {
        Self::with_low_stock_margin(0)
    }

    /// Creates a tracker that also reports [`StockLevel::LowStock`] when the
    /// stock is within `margin` units above the critical level.
    ///
    /// A margin of zero or less disables the low-stock level.
    pub fn with_low_stock_margin(margin: i64) -> Self {
        Self {
            notifiers: Registry::new(),
            low_stock_margin: margin,
        }
    }

    pub fn add_notifier(&self, notifier: Arc<StockNotifier>) -> SubscriberId {
        self.notifiers.add(notifier)
    }

    pub fn remove_notifier<S: ?Sized>(&self, notifier: &Arc<S>) -> bool {
        self.notifiers.remove(notifier)
    }

    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }

    /// Returns the level a stock update should be reported at, if any.
    pub fn classify(&self, product: &Product) -> Option<StockLevel> {
        if product.stock <= 0 {
            Some(StockLevel::OutOfStock)
        } else if product.stock < product.critical_stock {
            Some(StockLevel::CriticalStock)
        } else if self.low_stock_margin > 0
            && product.stock < product.critical_stock.saturating_add(self.low_stock_margin)
        {
            Some(StockLevel::LowStock)
        } else {
            None
        }
    }

    /// Classifies a stock update and notifies every registered notifier.
    ///
    /// Returns the broadcast notification with its delivery count, or `None`
    /// if the stock level did not call for one.
    pub fn process_stock_update(
        &self,
        product: &Product,
    ) -> Result<Option<StockUpdate>, BroadcastError> {
        let Some(level) = self.classify(product) else {
            debug!(
                "Product {} stock {} is above critical level {}, nothing to report",
                product.id, product.stock, product.critical_stock
            );
            return Ok(None);
        };

        let notification = StockNotification::new(product.clone(), level);
        debug!("Product {} classified as {}", product.id, level);
        let delivered = self.notifiers.broadcast(&notification)?;
        Ok(Some(StockUpdate {
            notification,
            delivered,
        }))
    }
}

impl Default for InventoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn notify_line(channel: &str, notification: &StockNotification) -> String {
    format!("Notification for {}: {}", channel, notification.message())
}

/// Alerts the purchasing department.
pub struct PurchasingDepartmentNotifier {
    sink: Arc<dyn Sink>,
}

impl PurchasingDepartmentNotifier {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<StockNotification> for PurchasingDepartmentNotifier {
    fn name(&self) -> &str {
        "purchasing_department"
    }

    fn receive(&self, notification: &StockNotification) -> Result<()> {
        self.sink.emit(&notify_line("Purchasing Department", notification))
    }
}

/// E-mails the supplier.
pub struct SupplierEmailNotifier {
    sink: Arc<dyn Sink>,
}

impl SupplierEmailNotifier {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<StockNotification> for SupplierEmailNotifier {
    fn name(&self) -> &str {
        "supplier_email"
    }

    fn receive(&self, notification: &StockNotification) -> Result<()> {
        self.sink.emit(&notify_line("Supplier", notification))
    }
}

/// Updates the availability shown on the website.
pub struct WebsiteUpdater {
    sink: Arc<dyn Sink>,
}

impl WebsiteUpdater {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<StockNotification> for WebsiteUpdater {
    fn name(&self) -> &str {
        "website"
    }

    fn receive(&self, notification: &StockNotification) -> Result<()> {
        self.sink.emit(&notify_line("Website", notification))
    }
}

/// Texts the store manager.
pub struct ManagerSmsNotifier {
    sink: Arc<dyn Sink>,
}

impl ManagerSmsNotifier {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }
}

impl Subscriber<StockNotification> for ManagerSmsNotifier {
    fn name(&self) -> &str {
        "manager_sms"
    }

    fn receive(&self, notification: &StockNotification) -> Result<()> {
        self.sink.emit(&notify_line("Manager", notification))
    }
}
