//! Inventory Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock level at or below which an item is considered low on stock
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Derived stock classification of an inventory item
///
/// Wire values carry spaces; they match the persisted `stock_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// Classify a stock level
    ///
    /// `<= 0` is out of stock, `<= LOW_STOCK_THRESHOLD` is low, anything
    /// above is in stock.
    pub fn for_level(level: i64) -> Self {
        if level <= 0 {
            Self::OutOfStock
        } else if level <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock => write!(f, "In Stock"),
            Self::LowStock => write!(f, "Low Stock"),
            Self::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// Inventory item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Option<String>,
    /// Owning user reference
    pub user_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock_level: i64,
    pub price: f64,
    /// Derived from `stock_level`; kept consistent by the services
    pub stock_status: StockStatus,
    pub date_added: Option<String>,
    pub updated_at: Option<String>,
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock_level: i64,
    pub price: f64,
}

/// Update inventory item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}
