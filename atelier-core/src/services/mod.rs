//! Application services
//!
//! Each service owns one area of the app and runs against an injected
//! `Arc<dyn StoreClient>`, scoped to a single user.

pub mod customers;
pub mod inventory;
pub mod messaging;
pub mod sales;
pub mod service_requests;

pub use customers::CustomerService;
pub use inventory::InventoryService;
pub use messaging::MessagingService;
pub use sales::SalesService;
pub use service_requests::ServiceRequestService;

use serde_json::Value;

/// Current timestamp in the store's wire format
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Remove an explicit `id: null` so the store mints the id on insert
pub(crate) fn strip_null_id(row: &mut Value) {
    if let Some(obj) = row.as_object_mut()
        && obj.get("id").is_some_and(Value::is_null)
    {
        obj.remove("id");
    }
}
