//! Row query builder
//!
//! A small, backend-agnostic description of a row-level read: equality
//! filters, an any-column case-insensitive contains filter, ordering and a
//! result cap. The remote client translates it to REST query parameters; the
//! local client evaluates it in memory via [`Filter::matches`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Column equals value
    Eq { column: String, value: Value },
    /// Case-insensitive substring match against any of the columns (logical OR)
    ContainsAny { columns: Vec<String>, needle: String },
}

impl Filter {
    /// Evaluate this filter against a JSON row object
    pub fn matches(&self, row: &Value) -> bool {
        match self {
            Self::Eq { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
            Self::ContainsAny { columns, needle } => {
                let needle = needle.to_lowercase();
                columns.iter().any(|col| {
                    row.get(col)
                        .and_then(Value::as_str)
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Row query - filters, ordering and result cap for a list read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowQuery {
    /// Filter conditions (logical AND)
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Order-by column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Descending order (default ascending)
    #[serde(default)]
    pub descending: bool,
    /// Maximum number of rows to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RowQuery {
    /// Create an empty query (all rows)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Add a case-insensitive any-column contains filter
    pub fn contains_any(mut self, columns: &[&str], needle: impl Into<String>) -> Self {
        self.filters.push(Filter::ContainsAny {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            needle: needle.into(),
        });
        self
    }

    /// Order results by a column (ascending)
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    /// Order results descending
    pub fn desc(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Cap the number of returned rows
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluate all filters against a JSON row object (logical AND)
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = RowQuery::new()
            .eq("user_id", "user-1")
            .order_by("name")
            .limit(10);

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.order_by.as_deref(), Some("name"));
        assert_eq!(query.limit, Some(10));
        assert!(!query.descending);
    }

    #[test]
    fn test_eq_filter_matches() {
        let query = RowQuery::new().eq("user_id", "user-1");
        assert!(query.matches(&json!({"user_id": "user-1", "name": "Rolex"})));
        assert!(!query.matches(&json!({"user_id": "user-2", "name": "Rolex"})));
        // Missing column only matches an explicit null
        assert!(!query.matches(&json!({"name": "Rolex"})));
    }

    #[test]
    fn test_contains_any_is_case_insensitive() {
        let query = RowQuery::new().contains_any(&["name", "sku", "brand"], "RoL");
        assert!(query.matches(&json!({"name": "Submariner", "brand": "Rolex"})));
        assert!(query.matches(&json!({"name": "rolex datejust", "brand": null})));
        assert!(!query.matches(&json!({"name": "Speedmaster", "brand": "Omega"})));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = RowQuery::new()
            .eq("user_id", "user-1")
            .contains_any(&["name"], "sub");
        assert!(query.matches(&json!({"user_id": "user-1", "name": "Submariner"})));
        assert!(!query.matches(&json!({"user_id": "user-2", "name": "Submariner"})));
    }
}
