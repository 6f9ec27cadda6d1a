//! Shared types for the Atelier workspace
//!
//! Entity models, payload types, error types and the row-query builder
//! used by both the store client and the application services.

pub mod error;
pub mod models;
pub mod query;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Error re-exports (for convenient access)
pub use error::{AppError, AppResult, ErrorCode};

// Query re-exports
pub use query::{Filter, RowQuery};
