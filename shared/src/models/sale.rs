//! Sale Model

use serde::{Deserialize, Serialize};

/// Sale entity (invoice header)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Option<String>,
    pub user_id: String,
    /// Formatted invoice number, e.g. "#0007"
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
    pub total: f64,
    pub created_at: Option<String>,
}

/// Sale line entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Option<String>,
    pub user_id: String,
    /// Sale header reference
    pub sale_id: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub cost_price: Option<f64>,
    /// quantity x price
    pub subtotal: f64,
    /// Weak reference to the inventory item to adjust.
    /// Absent means the line has no stock effect.
    pub inventory_id: Option<String>,
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<SaleItemCreate>,
}

/// Create sale line payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemCreate {
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub inventory_id: Option<String>,
}

impl SaleItemCreate {
    /// Line subtotal (quantity x price)
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}
