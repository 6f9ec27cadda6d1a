//! Error types for the Atelier workspace
//!
//! `AppError` is the primary error type for application services. It pairs a
//! stable [`ErrorCode`] with a human-readable message so the UI layer can
//! surface failures without pattern matching on strings.

mod codes;
mod types;

pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
