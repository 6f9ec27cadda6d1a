//! Service Request Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service request workflow status
///
/// Wire values carry spaces; they match the persisted `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "ready for pickup")]
    ReadyForPickup,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in progress"),
            Self::ReadyForPickup => write!(f, "ready for pickup"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Service request payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

/// Service request entity (watch repair / service intake)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: Option<String>,
    pub user_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub watch_brand: Option<String>,
    pub watch_model: Option<String>,
    pub serial_number: Option<String>,
    pub issue_description: Option<String>,
    pub status: ServiceStatus,
    pub payment_status: PaymentStatus,
    pub price: Option<f64>,
    pub estimated_completion: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create service request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestCreate {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub watch_brand: Option<String>,
    pub watch_model: Option<String>,
    pub serial_number: Option<String>,
    pub issue_description: Option<String>,
    pub price: Option<f64>,
    pub estimated_completion: Option<String>,
}

/// Update service request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&ServiceStatus::ReadyForPickup).unwrap(),
            "\"ready for pickup\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::PartiallyPaid).unwrap(),
            "\"partially_paid\""
        );
    }
}
