//! Customer service

use atelier_client::StoreClient;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::{AppError, AppResult, RowQuery};
use std::sync::Arc;

use super::{now_rfc3339, strip_null_id};

pub const TABLE: &str = "customers";

/// Customer service for one user
#[derive(Clone)]
pub struct CustomerService {
    client: Arc<dyn StoreClient>,
    user_id: String,
}

impl CustomerService {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// All customers for this user, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .order_by("name");
        let rows = self.client.select(TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    pub async fn create(&self, payload: CustomerCreate) -> AppResult<Customer> {
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }

        let now = now_rfc3339();
        let customer = Customer {
            id: None,
            user_id: self.user_id.clone(),
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
            notes: payload.notes,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        let mut row = serde_json::to_value(&customer)?;
        strip_null_id(&mut row);

        let stored = self.client.insert(TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn update(&self, id: &str, patch: CustomerUpdate) -> AppResult<Customer> {
        let mut patch = serde_json::to_value(&patch)?;
        if let Some(obj) = patch.as_object_mut() {
            obj.insert(
                "updated_at".to_string(),
                serde_json::Value::String(now_rfc3339()),
            );
        }
        let stored = self.client.update(TABLE, id, &self.user_id, patch).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Ok(self.client.delete(TABLE, id, &self.user_id).await?)
    }
}
