//! Sales service
//!
//! Records and reverses sales. The sale and its lines are the primary
//! mutation and propagate failures; the per-line stock adjustment is a
//! best-effort side effect that never blocks the sale.

use atelier_client::StoreClient;
use shared::models::{Sale, SaleCreate, SaleItem};
use shared::{AppError, AppResult, RowQuery};
use std::sync::Arc;

use crate::invoice;
use crate::stock::StockMovement;

use super::{InventoryService, now_rfc3339, strip_null_id};

pub const SALES_TABLE: &str = "sales";
pub const SALE_ITEMS_TABLE: &str = "sale_items";

/// Sales service for one user
#[derive(Clone)]
pub struct SalesService {
    client: Arc<dyn StoreClient>,
    inventory: InventoryService,
    user_id: String,
}

impl SalesService {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            inventory: InventoryService::new(client.clone(), user_id.clone()),
            client,
            user_id,
        }
    }

    /// Record a completed sale.
    ///
    /// Generates the invoice number, persists the sale header and lines, then
    /// decrements stock for every line that references an inventory item.
    pub async fn record_sale(&self, payload: SaleCreate) -> AppResult<Sale> {
        if payload.items.is_empty() {
            return Err(AppError::validation("a sale needs at least one line"));
        }
        for line in &payload.items {
            if line.quantity <= 0 {
                return Err(AppError::validation("quantity must be positive"));
            }
            if line.price < 0.0 {
                return Err(AppError::validation("price must not be negative"));
            }
        }

        let invoice_number = invoice::next_invoice_number(self.client.as_ref()).await;
        let total: f64 = payload.items.iter().map(|l| l.subtotal()).sum();

        let sale = Sale {
            id: None,
            user_id: self.user_id.clone(),
            invoice_number,
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            payment_method: payload.payment_method,
            total,
            created_at: Some(now_rfc3339()),
        };
        let mut row = serde_json::to_value(&sale)?;
        strip_null_id(&mut row);
        let stored = self.client.insert(SALES_TABLE, row).await?;
        let sale: Sale = serde_json::from_value(stored)?;
        let sale_id = sale
            .id
            .clone()
            .ok_or_else(|| AppError::internal("store returned a sale without an id"))?;

        for line in &payload.items {
            let item = SaleItem {
                id: None,
                user_id: self.user_id.clone(),
                sale_id: Some(sale_id.clone()),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price: line.price,
                cost_price: line.cost_price,
                subtotal: line.subtotal(),
                inventory_id: line.inventory_id.clone(),
            };
            let mut row = serde_json::to_value(&item)?;
            strip_null_id(&mut row);
            self.client.insert(SALE_ITEMS_TABLE, row).await?;
        }

        // Best-effort stock reconciliation after the sale is committed
        for line in &payload.items {
            self.inventory
                .apply_stock_movement(line.inventory_id.as_deref(), line.quantity, StockMovement::Sale)
                .await;
        }

        tracing::info!(invoice = %sale.invoice_number, total, "Sale recorded");
        Ok(sale)
    }

    /// Reverse a sale: restore stock for every tracked line, then delete the
    /// lines and the header.
    pub async fn refund_sale(&self, sale_id: &str) -> AppResult<()> {
        let items = self.items_for(sale_id).await?;

        for item in &items {
            self.inventory
                .apply_stock_movement(item.inventory_id.as_deref(), item.quantity, StockMovement::Return)
                .await;
        }

        for item in &items {
            if let Some(id) = &item.id {
                self.client
                    .delete(SALE_ITEMS_TABLE, id, &self.user_id)
                    .await?;
            }
        }
        self.client.delete(SALES_TABLE, sale_id, &self.user_id).await?;

        tracing::info!(sale_id, "Sale refunded");
        Ok(())
    }

    /// All sales for this user, newest first
    pub async fn list(&self) -> AppResult<Vec<Sale>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .order_by("created_at")
            .desc();
        let rows = self.client.select(SALES_TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Lines belonging to a sale
    pub async fn items_for(&self, sale_id: &str) -> AppResult<Vec<SaleItem>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .eq("sale_id", sale_id);
        let rows = self.client.select(SALE_ITEMS_TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }
}
