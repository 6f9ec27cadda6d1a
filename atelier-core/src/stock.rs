//! Stock level arithmetic
//!
//! Pure half of stock reconciliation; persistence lives in
//! [`crate::services::InventoryService::apply_stock_movement`].

/// Direction of a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    /// A completed sale decrements stock
    Sale,
    /// A return restores stock
    Return,
}

/// Compute the stock level after a movement.
///
/// A sale floors at zero: over-selling is silently absorbed rather than
/// producing a negative level. A return is unbounded.
pub fn next_level(current: i64, quantity: i64, movement: StockMovement) -> i64 {
    match movement {
        StockMovement::Sale => (current - quantity).max(0),
        StockMovement::Return => current + quantity,
    }
}
