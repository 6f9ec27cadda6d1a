//! Invoice number generation
//!
//! Numbers come from the store-side sequence `invoice_number_seq` via the
//! `nextval` remote procedure. The RPC is best-effort: on failure the number
//! falls back to the last four digits of the wall clock so a sale is never
//! blocked on the sequence.

use atelier_client::{ClientError, StoreClient};
use serde_json::json;

/// Name of the store-side invoice sequence
pub const INVOICE_SEQUENCE: &str = "invoice_number_seq";

/// Format a sequence value as an invoice number.
///
/// Values below 10000 are zero-padded to four digits; larger values are kept
/// whole, never truncated (`7` -> `#0007`, `12345` -> `#12345`).
pub fn format_invoice_number(value: i64) -> String {
    format!("#{:04}", value)
}

/// Fetch the next invoice number, falling back to a clock-derived number if
/// the sequence RPC fails.
pub async fn next_invoice_number(client: &dyn StoreClient) -> String {
    let result = client
        .rpc("nextval", json!({ "sequence_name": INVOICE_SEQUENCE }))
        .await
        .and_then(|v| {
            v.as_i64()
                .ok_or_else(|| ClientError::InvalidResponse(format!("nextval returned {}", v)))
        });

    match result {
        Ok(value) => format_invoice_number(value),
        Err(e) => {
            tracing::warn!(error = %e, "Invoice sequence RPC failed, using clock fallback");
            format_invoice_number(chrono::Utc::now().timestamp_millis() % 10_000)
        }
    }
}
