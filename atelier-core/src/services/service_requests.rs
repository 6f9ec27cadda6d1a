//! Service request service
//!
//! Watch repair / service intake records. New requests start pending and
//! unpaid; status moves through the workflow via updates.

use atelier_client::StoreClient;
use shared::models::{
    PaymentStatus, ServiceRequest, ServiceRequestCreate, ServiceRequestUpdate, ServiceStatus,
};
use shared::{AppError, AppResult, RowQuery};
use std::sync::Arc;

use super::{now_rfc3339, strip_null_id};

pub const TABLE: &str = "service_requests";

/// Service request service for one user
#[derive(Clone)]
pub struct ServiceRequestService {
    client: Arc<dyn StoreClient>,
    user_id: String,
}

impl ServiceRequestService {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// All requests for this user, newest first
    pub async fn list(&self) -> AppResult<Vec<ServiceRequest>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .order_by("created_at")
            .desc();
        let rows = self.client.select(TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    pub async fn create(&self, payload: ServiceRequestCreate) -> AppResult<ServiceRequest> {
        if payload.customer_name.trim().is_empty() {
            return Err(AppError::validation("customer name must not be empty"));
        }

        let now = now_rfc3339();
        let request = ServiceRequest {
            id: None,
            user_id: self.user_id.clone(),
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            customer_email: payload.customer_email,
            watch_brand: payload.watch_brand,
            watch_model: payload.watch_model,
            serial_number: payload.serial_number,
            issue_description: payload.issue_description,
            status: ServiceStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            price: payload.price,
            estimated_completion: payload.estimated_completion,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        let mut row = serde_json::to_value(&request)?;
        strip_null_id(&mut row);

        let stored = self.client.insert(TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn update(&self, id: &str, patch: ServiceRequestUpdate) -> AppResult<ServiceRequest> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_client::LocalStoreClient;

    fn payload() -> ServiceRequestCreate {
        ServiceRequestCreate {
            customer_name: "Ana".to_string(),
            customer_phone: Some("+34 600 000 000".to_string()),
            customer_email: None,
            watch_brand: Some("Omega".to_string()),
            watch_model: Some("Speedmaster".to_string()),
            serial_number: None,
            issue_description: Some("running fast".to_string()),
            price: None,
            estimated_completion: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending_and_unpaid() {
        let client = Arc::new(LocalStoreClient::new());
        let service = ServiceRequestService::new(client, "u1");

        let request = service.create(payload()).await.unwrap();
        assert_eq!(request.status, ServiceStatus::Pending);
        assert_eq!(request.payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_status_transition_persists_wire_value() {
        let client = Arc::new(LocalStoreClient::new());
        let service = ServiceRequestService::new(client.clone(), "u1");
        let request = service.create(payload()).await.unwrap();
        let id = request.id.unwrap();

        let updated = service
            .update(
                &id,
                ServiceRequestUpdate {
                    status: Some(ServiceStatus::ReadyForPickup),
                    payment_status: Some(PaymentStatus::PartiallyPaid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ServiceStatus::ReadyForPickup);

        // The stored row carries the exact enumerated strings
        let row = &client.rows(TABLE)[0];
        assert_eq!(row["status"], "ready for pickup");
        assert_eq!(row["payment_status"], "partially_paid");
    }
}
