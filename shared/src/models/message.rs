//! Messaging Models
//!
//! Outbound notification records and the payload sent to the `send-message`
//! serverless function.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageChannel {
    Sms,
    Whatsapp,
}

impl fmt::Display for MessageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Whatsapp => write!(f, "whatsapp"),
        }
    }
}

/// Message delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Failed,
}

/// Outbound message record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLog {
    pub id: Option<String>,
    pub user_id: String,
    pub customer_id: Option<String>,
    pub template_id: Option<String>,
    pub recipient_phone: String,
    pub channel: MessageChannel,
    pub body: Option<String>,
    pub status: MessageStatus,
    /// Business event that triggered the message (e.g. "service_ready")
    pub event: Option<String>,
    pub created_at: Option<String>,
}

/// Reusable message template with `{{variable}}` placeholders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub channel: MessageChannel,
    pub body: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create message template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplateCreate {
    pub name: String,
    pub channel: MessageChannel,
    pub body: String,
}

/// Per-user notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub id: Option<String>,
    pub user_id: String,
    pub default_channel: MessageChannel,
    pub notify_on_service_ready: bool,
    pub notify_on_sale: bool,
    pub updated_at: Option<String>,
}

/// Structured payload for the `send-message` serverless function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_phone: String,
    pub channel: MessageChannel,
    /// Template reference; `message` is used verbatim when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Variable substitutions applied server-side to the template body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    /// Business event reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}
