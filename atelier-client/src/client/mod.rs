//! Client module - store client trait and implementations.

mod local;
mod remote;

use async_trait::async_trait;
use serde_json::Value;
use shared::RowQuery;

use crate::error::ClientResult;

// Re-export main types
pub use local::{LocalStoreClient, OpRecord, StoreOp};
pub use remote::RemoteStoreClient;

/// Row-level access to the hosted relational store.
///
/// Implementations are injected into the application services as
/// `Arc<dyn StoreClient>`; nothing in the workspace holds a process-wide
/// client singleton.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Read rows from a named relation
    async fn select(&self, table: &str, query: &RowQuery) -> ClientResult<Vec<Value>>;

    /// Insert a row, returning the stored representation
    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value>;

    /// Patch a row by id, scoped to the owning user, returning the stored representation
    async fn update(&self, table: &str, id: &str, user_id: &str, patch: Value)
    -> ClientResult<Value>;

    /// Delete a row by id, scoped to the owning user
    async fn delete(&self, table: &str, id: &str, user_id: &str) -> ClientResult<()>;

    /// Call a remote procedure (e.g. a sequence `nextval`)
    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value>;

    /// Invoke a serverless function (e.g. `send-message`)
    async fn invoke(&self, function: &str, payload: Value) -> ClientResult<Value>;
}
