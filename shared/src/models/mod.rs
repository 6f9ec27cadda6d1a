//! Entity models
//!
//! Field names and enumerated string values reproduce the hosted store's
//! contract exactly; they are part of the external interface.

mod customer;
mod inventory;
mod message;
mod sale;
mod service_request;

pub use customer::{Customer, CustomerCreate, CustomerUpdate};
pub use inventory::{
    InventoryItem, InventoryItemCreate, InventoryItemUpdate, StockStatus, LOW_STOCK_THRESHOLD,
};
pub use message::{
    MessageChannel, MessageLog, MessageStatus, MessageTemplate, MessageTemplateCreate,
    NotificationSettings, SendMessageRequest,
};
pub use sale::{Sale, SaleCreate, SaleItem, SaleItemCreate};
pub use service_request::{
    PaymentStatus, ServiceRequest, ServiceRequestCreate, ServiceRequestUpdate, ServiceStatus,
};
