//! Messaging service
//!
//! Outbound customer notifications via the `send-message` serverless
//! function, with a log row written for every attempt. Message templates and
//! per-user notification settings live here too.

use atelier_client::StoreClient;
use shared::models::{
    MessageLog, MessageStatus, MessageTemplate, MessageTemplateCreate, NotificationSettings,
    SendMessageRequest,
};
use shared::{AppError, AppResult, RowQuery};
use std::sync::Arc;

use super::{now_rfc3339, strip_null_id};

pub const LOGS_TABLE: &str = "message_logs";
pub const TEMPLATES_TABLE: &str = "message_templates";
pub const SETTINGS_TABLE: &str = "notification_settings";
pub const SEND_MESSAGE_FN: &str = "send-message";

/// Messaging service for one user
#[derive(Clone)]
pub struct MessagingService {
    client: Arc<dyn StoreClient>,
    user_id: String,
}

impl MessagingService {
    pub fn new(client: Arc<dyn StoreClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    /// Send a message through the serverless function and log the attempt.
    ///
    /// The invocation result is propagated to the caller; the log write is
    /// best-effort and never masks the send outcome.
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
        customer_id: Option<String>,
    ) -> AppResult<MessageLog> {
        if request.recipient_phone.trim().is_empty() {
            return Err(AppError::validation("recipient phone must not be empty"));
        }

        let payload = serde_json::to_value(&request)?;
        let outcome = self.client.invoke(SEND_MESSAGE_FN, payload).await;
        let status = if outcome.is_ok() {
            MessageStatus::Sent
        } else {
            MessageStatus::Failed
        };

        let log = MessageLog {
            id: None,
            user_id: self.user_id.clone(),
            customer_id,
            template_id: request.template_id.clone(),
            recipient_phone: request.recipient_phone.clone(),
            channel: request.channel,
            body: request.message.clone(),
            status,
            event: request.event.clone(),
            created_at: Some(now_rfc3339()),
        };
        let log = match serde_json::to_value(&log) {
            Ok(mut row) => {
                strip_null_id(&mut row);
                match self.client.insert(LOGS_TABLE, row).await {
                    Ok(stored) => serde_json::from_value(stored).unwrap_or(log),
                    Err(e) => {
                        tracing::warn!(error = %e, "Message log write failed");
                        log
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Message log serialization failed");
                log
            }
        };

        match outcome {
            Ok(_) => Ok(log),
            Err(e) => Err(AppError::function(e.to_string())),
        }
    }

    /// Message history for this user, newest first
    pub async fn list_logs(&self) -> AppResult<Vec<MessageLog>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .order_by("created_at")
            .desc();
        let rows = self.client.select(LOGS_TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    // ==================== Templates ====================

    pub async fn templates(&self) -> AppResult<Vec<MessageTemplate>> {
        let query = RowQuery::new()
            .eq("user_id", self.user_id.as_str())
            .order_by("name");
        let rows = self.client.select(TEMPLATES_TABLE, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    pub async fn create_template(
        &self,
        payload: MessageTemplateCreate,
    ) -> AppResult<MessageTemplate> {
        if payload.name.trim().is_empty() || payload.body.trim().is_empty() {
            return Err(AppError::validation("template name and body are required"));
        }

        let now = now_rfc3339();
        let template = MessageTemplate {
            id: None,
            user_id: self.user_id.clone(),
            name: payload.name,
            channel: payload.channel,
            body: payload.body,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        let mut row = serde_json::to_value(&template)?;
        strip_null_id(&mut row);

        let stored = self.client.insert(TEMPLATES_TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete_template(&self, id: &str) -> AppResult<()> {
        Ok(self.client.delete(TEMPLATES_TABLE, id, &self.user_id).await?)
    }

    // ==================== Settings ====================

    /// This user's notification settings, if any have been saved
    pub async fn settings(&self) -> AppResult<Option<NotificationSettings>> {
        let query = RowQuery::new().eq("user_id", self.user_id.as_str()).limit(1);
        let rows = self.client.select(SETTINGS_TABLE, &query).await?;
        rows.into_iter()
            .next()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .transpose()
    }

    /// Create or replace this user's notification settings
    pub async fn save_settings(
        &self,
        mut settings: NotificationSettings,
    ) -> AppResult<NotificationSettings> {
        settings.user_id = self.user_id.clone();
        settings.updated_at = Some(now_rfc3339());

        let existing = self.settings().await?;
        let stored = match existing.and_then(|s| s.id) {
            Some(id) => {
                settings.id = Some(id.clone());
                let patch = serde_json::to_value(&settings)?;
                self.client
                    .update(SETTINGS_TABLE, &id, &self.user_id, patch)
                    .await?
            }
            None => {
                let mut row = serde_json::to_value(&settings)?;
                strip_null_id(&mut row);
                self.client.insert(SETTINGS_TABLE, row).await?
            }
        };
        Ok(serde_json::from_value(stored)?)
    }
}
