//! Atelier application core
//!
//! Application services for a small watch-shop management app: inventory,
//! sales, customers, service requests and outbound messaging, all running
//! against an injected [`atelier_client::StoreClient`].
//!
//! Three mechanisms carry the interesting state:
//! - [`stock`] / [`services::InventoryService`]: stock reconciliation on sale
//!   and return, with the floor clamp and derived stock status.
//! - [`search::SuggestionSearch`]: debounced, generation-guarded live lookup.
//! - [`dialog::DialogController`]: create/edit dialog lifecycle with a
//!   deferred clear that can never act on a stale selection.

pub mod dialog;
pub mod invoice;
pub mod search;
pub mod services;
pub mod stock;

pub use dialog::{CloseMode, DialogController, DialogState};
pub use search::SuggestionSearch;
pub use stock::StockMovement;
