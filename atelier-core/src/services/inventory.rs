//! Inventory service
//!
//! User-scoped CRUD over the `inventory` relation plus stock reconciliation.
//! `stock_status` is derived from `stock_level` on every write, so the two
//! can never drift apart through this service.

use atelier_client::StoreClient;
use serde_json::Value;
use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate, StockStatus};
use shared::{AppError, AppResult, RowQuery};
use std::sync::Arc;

use crate::stock::{self, StockMovement};

use super::{now_rfc3339, strip_null_id};

pub const TABLE: &str = "inventory";

/// Inventory service for one user
#[derive(Clone)]
pub struct InventoryService {
    client: Arc<dyn StoreClient>,
    user_id: String,
}

impl InventoryService {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    fn scoped(&self) -> RowQuery {
        RowQuery::new().eq("user_id", self.user_id.as_str())
    }

    /// All inventory items for this user, ordered by name
    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = self
            .client
            .select(TABLE, &self.scoped().order_by("name"))
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Fetch a single item by id
    pub async fn get(&self, id: &str) -> AppResult<InventoryItem> {
        let rows = self.client.select(TABLE, &self.scoped().eq("id", id)).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("inventory item"))?;
        Ok(serde_json::from_value(row)?)
    }

    /// Create an item; `stock_status` is derived from the initial level
    pub async fn create(&self, payload: InventoryItemCreate) -> AppResult<InventoryItem> {
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if payload.stock_level < 0 {
            return Err(AppError::validation("stock level must not be negative"));
        }
        if payload.price < 0.0 {
            return Err(AppError::validation("price must not be negative"));
        }

        let now = now_rfc3339();
        let item = InventoryItem {
            id: None,
            user_id: self.user_id.clone(),
            name: payload.name,
            brand: payload.brand,
            sku: payload.sku,
            category: payload.category,
            description: payload.description,
            image_url: payload.image_url,
            stock_level: payload.stock_level,
            price: payload.price,
            stock_status: StockStatus::for_level(payload.stock_level),
            date_added: Some(now.clone()),
            updated_at: Some(now),
        };
        let mut row = serde_json::to_value(&item)?;
        strip_null_id(&mut row);

        let stored = self.client.insert(TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Patch an item; re-derives `stock_status` whenever the level changes
    pub async fn update(&self, id: &str, patch: InventoryItemUpdate) -> AppResult<InventoryItem> {
        let mut patch = serde_json::to_value(&patch)?;
        if let Some(obj) = patch.as_object_mut() {
            if let Some(level) = obj.get("stock_level").and_then(Value::as_i64) {
                obj.insert(
                    "stock_status".to_string(),
                    serde_json::to_value(StockStatus::for_level(level))?,
                );
            }
            obj.insert("updated_at".to_string(), Value::String(now_rfc3339()));
        }

        let stored = self.client.update(TABLE, id, &self.user_id, patch).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Ok(self.client.delete(TABLE, id, &self.user_id).await?)
    }

    /// Case-insensitive name/sku/brand lookup for typeahead suggestions,
    /// ordered by name and capped at `cap` rows
    pub async fn search_suggestions(&self, query: &str, cap: u32) -> AppResult<Vec<InventoryItem>> {
        let row_query = self
            .scoped()
            .contains_any(&["name", "sku", "brand"], query)
            .order_by("name")
            .limit(cap);
        let rows = self.client.select(TABLE, &row_query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Adjust stock for a completed sale line or its reversal.
    ///
    /// Best-effort by design: a stock-update failure must not block or roll
    /// back the sale it is attached to, so every store error is logged and
    /// swallowed. Lines without an inventory reference are a no-op.
    ///
    /// The read-modify-write here is not atomic; concurrent sales against the
    /// same item are last-write-wins on the read snapshot.
    pub async fn apply_stock_movement(
        &self,
        inventory_id: Option<&str>,
        quantity: i64,
        movement: StockMovement,
    ) {
        let Some(inventory_id) = inventory_id else {
            // No stock effect for untracked lines
            return;
        };

        let rows = match self
            .client
            .select(TABLE, &self.scoped().eq("id", inventory_id))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(inventory_id, error = %e, "Stock read failed, skipping adjustment");
                return;
            }
        };
        let Some(row) = rows.first() else {
            tracing::warn!(inventory_id, "Inventory row missing, skipping adjustment");
            return;
        };

        let current = row.get("stock_level").and_then(Value::as_i64).unwrap_or(0);
        let level = stock::next_level(current, quantity, movement);
        let status = StockStatus::for_level(level);

        let patch = serde_json::json!({
            "stock_level": level,
            "stock_status": status,
            "updated_at": now_rfc3339(),
        });
        if let Err(e) = self
            .client
            .update(TABLE, inventory_id, &self.user_id, patch)
            .await
        {
            tracing::warn!(inventory_id, error = %e, "Stock write failed, sale unaffected");
        } else {
            tracing::debug!(inventory_id, from = current, to = level, ?movement, "Stock adjusted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_client::LocalStoreClient;

    fn service() -> (Arc<LocalStoreClient>, InventoryService) {
        let client = Arc::new(LocalStoreClient::new());
        let service = InventoryService::new(client.clone(), "u1");
        (client, service)
    }

    fn payload(name: &str, stock_level: i64) -> InventoryItemCreate {
        InventoryItemCreate {
            name: name.to_string(),
            brand: Some("Rolex".to_string()),
            sku: Some("SUB-1".to_string()),
            category: None,
            description: None,
            image_url: None,
            stock_level,
            price: 8500.0,
        }
    }

    #[tokio::test]
    async fn test_create_derives_status() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 3)).await.unwrap();
        assert_eq!(item.stock_status, StockStatus::LowStock);
        assert!(item.id.is_some());
        assert!(item.date_added.is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let (_, service) = service();
        assert!(service.create(payload("  ", 1)).await.is_err());
        assert!(service.create(payload("Submariner", -1)).await.is_err());
        let mut negative_price = payload("Submariner", 1);
        negative_price.price = -1.0;
        assert!(service.create(negative_price).await.is_err());
    }

    #[tokio::test]
    async fn test_update_rederives_status() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 10)).await.unwrap();
        let id = item.id.unwrap();

        let updated = service
            .update(
                &id,
                InventoryItemUpdate {
                    stock_level: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock_status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_update_without_level_keeps_status() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 10)).await.unwrap();
        let id = item.id.unwrap();

        let updated = service
            .update(
                &id,
                InventoryItemUpdate {
                    price: Some(9000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock_status, StockStatus::InStock);
        assert_eq!(updated.stock_level, 10);
    }

    #[tokio::test]
    async fn test_suggestions_match_any_column() {
        let (_, service) = service();
        service.create(payload("Submariner", 3)).await.unwrap();
        let mut omega = payload("Speedmaster", 3);
        omega.brand = Some("Omega".to_string());
        omega.sku = Some("SM-1".to_string());
        service.create(omega).await.unwrap();

        // "rol" hits the Rolex brand column, not the name
        let hits = service.search_suggestions("rol", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Submariner");
    }

    #[tokio::test]
    async fn test_sale_movement_decrements_and_reclassifies() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 10)).await.unwrap();
        let id = item.id.unwrap();

        service
            .apply_stock_movement(Some(&id), 6, StockMovement::Sale)
            .await;
        let after = service.get(&id).await.unwrap();
        assert_eq!(after.stock_level, 4);
        assert_eq!(after.stock_status, StockStatus::LowStock);
    }

    #[tokio::test]
    async fn test_oversell_floors_at_zero() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 2)).await.unwrap();
        let id = item.id.unwrap();

        service
            .apply_stock_movement(Some(&id), 5, StockMovement::Sale)
            .await;
        let after = service.get(&id).await.unwrap();
        assert_eq!(after.stock_level, 0);
        assert_eq!(after.stock_status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_return_restores_stock() {
        let (_, service) = service();
        let item = service.create(payload("Submariner", 0)).await.unwrap();
        let id = item.id.unwrap();

        service
            .apply_stock_movement(Some(&id), 6, StockMovement::Return)
            .await;
        let after = service.get(&id).await.unwrap();
        assert_eq!(after.stock_level, 6);
        assert_eq!(after.stock_status, StockStatus::InStock);
    }

    #[tokio::test]
    async fn test_untracked_line_is_a_no_op() {
        let (client, service) = service();
        service
            .apply_stock_movement(None, 5, StockMovement::Sale)
            .await;
        assert_eq!(client.mutations_for(TABLE), 0);
        assert!(client.ops().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let (client, service) = service();
        let item = service.create(payload("Submariner", 10)).await.unwrap();
        let id = item.id.unwrap();

        client.fail_table(TABLE);
        // Must not error or panic
        service
            .apply_stock_movement(Some(&id), 1, StockMovement::Sale)
            .await;

        client.restore_table(TABLE);
        let after = service.get(&id).await.unwrap();
        assert_eq!(after.stock_level, 10);
    }
}
