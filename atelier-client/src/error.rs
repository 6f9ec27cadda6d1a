//! Client error types

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for shared::AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthorized => shared::AppError::new(shared::ErrorCode::NotAuthenticated),
            ClientError::Forbidden(msg) => {
                shared::AppError::with_message(shared::ErrorCode::PermissionDenied, msg)
            }
            ClientError::NotFound(msg) => shared::AppError::not_found(msg),
            ClientError::Validation(msg) => shared::AppError::validation(msg),
            other => shared::AppError::store(other.to_string()),
        }
    }
}

/// Map a reqwest response to a typed result, translating error statuses.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        if body.is_empty() {
            // DELETE and minimal-return writes answer with an empty body
            return serde_json::from_str("null")
                .map_err(|e| ClientError::InvalidResponse(e.to_string()));
        }
        return serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", e, body)));
    }

    let message = resp.text().await.unwrap_or_else(|_| status.to_string());
    tracing::warn!(status = status.as_u16(), %message, "Store request failed");
    Err(match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden(message),
        404 => ClientError::NotFound(message),
        400..=499 => ClientError::Validation(message),
        _ => ClientError::Internal(message),
    })
}
