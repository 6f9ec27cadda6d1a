//! Stable error codes
//!
//! Codes are part of the external contract: they are serialized into API
//! responses and matched by clients, so variants are append-only.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Stable error code identifying the class of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ==================== Request / Validation ====================
    InvalidRequest,
    ValidationFailed,

    // ==================== Auth ====================
    NotAuthenticated,
    PermissionDenied,

    // ==================== Resources ====================
    NotFound,
    AlreadyExists,

    // ==================== Remote store ====================
    StoreError,
    RpcError,
    FunctionError,

    // ==================== Internal ====================
    InternalError,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::ValidationFailed => "Validation failed",
            Self::NotAuthenticated => "Not authenticated",
            Self::PermissionDenied => "Permission denied",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::StoreError => "Remote store operation failed",
            Self::RpcError => "Remote procedure call failed",
            Self::FunctionError => "Serverless function invocation failed",
            Self::InternalError => "Internal error",
        }
    }

    /// HTTP status this code maps to when surfaced over an API boundary
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::StoreError | Self::RpcError | Self::FunctionError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::ValidationFailed).unwrap();
        assert_eq!(json, "\"VALIDATION_FAILED\"");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::StoreError.http_status(), StatusCode::BAD_GATEWAY);
    }
}
