//! Local store client
//!
//! In-memory implementation of [`StoreClient`] with the same filtering
//! semantics as the hosted backend. Used by tests and offline development.
//! Every call is appended to an op log so tests can assert which operations
//! ran (or that none did), and individual tables can be marked as failing to
//! exercise error paths.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use shared::RowQuery;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{ClientError, ClientResult};

use super::StoreClient;

/// Kind of store operation, recorded in the op log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Select,
    Insert,
    Update,
    Delete,
    Rpc,
    Invoke,
}

/// One entry of the op log: what ran against which table or function
#[derive(Debug, Clone)]
pub struct OpRecord {
    pub op: StoreOp,
    pub target: String,
}

type Handler = Box<dyn Fn(Value) -> ClientResult<Value> + Send + Sync>;

/// In-memory store client
#[derive(Default)]
pub struct LocalStoreClient {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    ops: Mutex<Vec<OpRecord>>,
    failing_tables: RwLock<HashSet<String>>,
    rpc_handlers: RwLock<HashMap<String, Handler>>,
    fn_handlers: RwLock<HashMap<String, Handler>>,
}

impl LocalStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a table
    pub fn seed(&self, table: impl Into<String>, rows: Vec<Value>) {
        self.tables.write().insert(table.into(), rows);
    }

    /// Snapshot of a table's rows
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }

    /// Register a remote procedure handler
    pub fn register_rpc(
        &self,
        name: impl Into<String>,
        handler: impl Fn(Value) -> ClientResult<Value> + Send + Sync + 'static,
    ) {
        self.rpc_handlers.write().insert(name.into(), Box::new(handler));
    }

    /// Register a serverless function handler
    pub fn register_function(
        &self,
        name: impl Into<String>,
        handler: impl Fn(Value) -> ClientResult<Value> + Send + Sync + 'static,
    ) {
        self.fn_handlers.write().insert(name.into(), Box::new(handler));
    }

    /// Make every operation against a table fail
    pub fn fail_table(&self, table: impl Into<String>) {
        self.failing_tables.write().insert(table.into());
    }

    /// Clear a previously injected table failure
    pub fn restore_table(&self, table: &str) {
        self.failing_tables.write().remove(table);
    }

    /// Snapshot of the op log
    pub fn ops(&self) -> Vec<OpRecord> {
        self.ops.lock().clone()
    }

    /// Number of mutating operations (insert/update/delete) recorded against a table
    pub fn mutations_for(&self, table: &str) -> usize {
        self.ops
            .lock()
            .iter()
            .filter(|r| {
                r.target == table
                    && matches!(r.op, StoreOp::Insert | StoreOp::Update | StoreOp::Delete)
            })
            .count()
    }

    fn record(&self, op: StoreOp, target: &str) {
        self.ops.lock().push(OpRecord {
            op,
            target: target.to_string(),
        });
    }

    fn check_fault(&self, table: &str) -> ClientResult<()> {
        if self.failing_tables.read().contains(table) {
            return Err(ClientError::Internal(format!(
                "injected failure for table {}",
                table
            )));
        }
        Ok(())
    }
}

/// Order two rows by a column, numbers numerically and everything else as text
fn compare_by(a: &Value, b: &Value, column: &str) -> Ordering {
    let va = a.get(column).unwrap_or(&Value::Null);
    let vb = b.get(column).unwrap_or(&Value::Null);
    match (va.as_f64(), vb.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => {
            let sa = va.as_str().map(str::to_string).unwrap_or_else(|| va.to_string());
            let sb = vb.as_str().map(str::to_string).unwrap_or_else(|| vb.to_string());
            sa.cmp(&sb)
        }
    }
}

fn row_matches_id(row: &Value, id: &str, user_id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
        && row.get("user_id").and_then(Value::as_str) == Some(user_id)
}

#[async_trait]
impl StoreClient for LocalStoreClient {
    async fn select(&self, table: &str, query: &RowQuery) -> ClientResult<Vec<Value>> {
        self.record(StoreOp::Select, table);
        self.check_fault(table)?;

        let mut rows: Vec<Value> = self
            .tables
            .read()
            .get(table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some(order_by) = &query.order_by {
            rows.sort_by(|a, b| compare_by(a, b, order_by));
            if query.descending {
                rows.reverse();
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> ClientResult<Value> {
        self.record(StoreOp::Insert, table);
        self.check_fault(table)?;

        let obj = row
            .as_object_mut()
            .ok_or_else(|| ClientError::Validation("row must be a JSON object".into()))?;
        // Mint an id unless the caller supplied one (explicit null counts as absent)
        if !matches!(obj.get("id"), Some(Value::String(_))) {
            obj.insert(
                "id".to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }

        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        user_id: &str,
        patch: Value,
    ) -> ClientResult<Value> {
        self.record(StoreOp::Update, table);
        self.check_fault(table)?;

        let patch_obj = patch
            .as_object()
            .ok_or_else(|| ClientError::Validation("patch must be a JSON object".into()))?;

        let mut tables = self.tables.write();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", table, id)))?;
        let row = rows
            .iter_mut()
            .find(|r| row_matches_id(r, id, user_id))
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", table, id)))?;

        if let Some(obj) = row.as_object_mut() {
            for (k, v) in patch_obj {
                obj.insert(k.clone(), v.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str, user_id: &str) -> ClientResult<()> {
        self.record(StoreOp::Delete, table);
        self.check_fault(table)?;

        let mut tables = self.tables.write();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", table, id)))?;
        let before = rows.len();
        rows.retain(|r| !row_matches_id(r, id, user_id));
        if rows.len() == before {
            return Err(ClientError::NotFound(format!("{} {}", table, id)));
        }
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        self.record(StoreOp::Rpc, function);
        let handlers = self.rpc_handlers.read();
        let handler = handlers
            .get(function)
            .ok_or_else(|| ClientError::NotFound(format!("rpc {}", function)))?;
        handler(args)
    }

    async fn invoke(&self, function: &str, payload: Value) -> ClientResult<Value> {
        self.record(StoreOp::Invoke, function);
        let handlers = self.fn_handlers.read();
        let handler = handlers
            .get(function)
            .ok_or_else(|| ClientError::NotFound(format!("function {}", function)))?;
        handler(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> LocalStoreClient {
        let client = LocalStoreClient::new();
        client.seed(
            "inventory",
            vec![
                json!({"id": "a", "user_id": "u1", "name": "Submariner", "brand": "Rolex", "sku": "SUB-1"}),
                json!({"id": "b", "user_id": "u1", "name": "Datejust", "brand": "Rolex", "sku": "DJ-1"}),
                json!({"id": "c", "user_id": "u2", "name": "Speedmaster", "brand": "Omega", "sku": "SM-1"}),
            ],
        );
        client
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_limits() {
        let client = seeded();
        let query = RowQuery::new()
            .eq("user_id", "u1")
            .contains_any(&["name", "sku", "brand"], "rol")
            .order_by("name")
            .limit(10);

        let rows = client.select("inventory", &query).await.unwrap();
        assert_eq!(rows.len(), 2);
        // Ordered by name ascending
        assert_eq!(rows[0]["name"], "Datejust");
        assert_eq!(rows[1]["name"], "Submariner");

        let capped = client
            .select("inventory", &RowQuery::new().limit(1))
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_mints_id() {
        let client = LocalStoreClient::new();
        let row = client
            .insert("customers", json!({"user_id": "u1", "name": "Ana"}))
            .await
            .unwrap();
        assert!(row["id"].as_str().is_some());
        assert_eq!(client.rows("customers").len(), 1);
    }

    #[tokio::test]
    async fn test_update_is_user_scoped() {
        let client = seeded();
        let err = client
            .update("inventory", "a", "u2", json!({"name": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));

        let row = client
            .update("inventory", "a", "u1", json!({"stock_level": 3}))
            .await
            .unwrap();
        assert_eq!(row["stock_level"], 3);
    }

    #[tokio::test]
    async fn test_op_log_counts_mutations() {
        let client = seeded();
        let _ = client.select("inventory", &RowQuery::new()).await;
        let _ = client
            .update("inventory", "a", "u1", json!({"stock_level": 1}))
            .await;
        assert_eq!(client.mutations_for("inventory"), 1);
        assert_eq!(client.ops().len(), 2);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let client = seeded();
        client.fail_table("inventory");
        let err = client
            .select("inventory", &RowQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));

        client.restore_table("inventory");
        assert!(client.select("inventory", &RowQuery::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_rpc_handler_dispatch() {
        let client = LocalStoreClient::new();
        client.register_rpc("nextval", |_| Ok(json!(7)));
        assert_eq!(client.rpc("nextval", json!({})).await.unwrap(), json!(7));
        let err = client.rpc("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
