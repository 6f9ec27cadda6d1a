//! Remote store client
//!
//! Talks to the hosted backend's REST surface: row CRUD under
//! `/rest/v1/{table}`, remote procedures under `/rest/v1/rpc/{fn}` and
//! serverless functions under `/functions/v1/{name}`. Row-level authorization
//! is enforced server-side from the bearer token; the client additionally
//! scopes writes by `user_id` so a misconfigured token cannot cross tenants.

use async_trait::async_trait;
use serde_json::Value;
use shared::query::{Filter, RowQuery};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, handle_response};

use super::StoreClient;

/// Store client backed by the hosted backend
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RemoteStoreClient {
    /// Build a client from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config("base URL not configured".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { http, config })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.bearer()))
    }

    /// Render a RowQuery as REST query parameters
    fn query_params(query: &RowQuery) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for filter in &query.filters {
            match filter {
                Filter::Eq { column, value } => {
                    params.push((column.clone(), format!("eq.{}", render_value(value))));
                }
                Filter::ContainsAny { columns, needle } => {
                    let clauses: Vec<String> = columns
                        .iter()
                        .map(|col| format!("{}.ilike.*{}*", col, needle))
                        .collect();
                    params.push(("or".to_string(), format!("({})", clauses.join(","))));
                }
            }
        }
        if let Some(order_by) = &query.order_by {
            let dir = if query.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order_by, dir)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Render a JSON value for use in a filter parameter
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl StoreClient for RemoteStoreClient {
    async fn select(&self, table: &str, query: &RowQuery) -> ClientResult<Vec<Value>> {
        let req = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&Self::query_params(query));
        handle_response(req.send().await?).await
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let req = self
            .authed(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&row);
        let mut rows: Vec<Value> = handle_response(req.send().await?).await?;
        rows.pop()
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no rows".into()))
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        user_id: &str,
        patch: Value,
    ) -> ClientResult<Value> {
        let req = self
            .authed(self.http.patch(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id)), ("user_id", format!("eq.{}", user_id))])
            .json(&patch);
        let mut rows: Vec<Value> = handle_response(req.send().await?).await?;
        rows.pop()
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", table, id)))
    }

    async fn delete(&self, table: &str, id: &str, user_id: &str) -> ClientResult<()> {
        let req = self
            .authed(self.http.delete(self.rest_url(table)))
            .query(&[("id", format!("eq.{}", id)), ("user_id", format!("eq.{}", user_id))]);
        let _: Value = handle_response(req.send().await?).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        let url = format!("{}/rest/v1/rpc/{}", self.config.base_url, function);
        let req = self.authed(self.http.post(url)).json(&args);
        handle_response(req.send().await?).await
    }

    async fn invoke(&self, function: &str, payload: Value) -> ClientResult<Value> {
        let url = format!("{}/functions/v1/{}", self.config.base_url, function);
        let req = self.authed(self.http.post(url)).json(&payload);
        handle_response(req.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params_rendering() {
        let query = RowQuery::new()
            .eq("user_id", "user-1")
            .contains_any(&["name", "sku", "brand"], "rol")
            .order_by("name")
            .limit(10);

        let params = RemoteStoreClient::query_params(&query);
        assert_eq!(
            params,
            vec![
                ("user_id".to_string(), "eq.user-1".to_string()),
                (
                    "or".to_string(),
                    "(name.ilike.*rol*,sku.ilike.*rol*,brand.ilike.*rol*)".to_string()
                ),
                ("order".to_string(), "name.asc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_value_keeps_strings_raw() {
        assert_eq!(render_value(&json!("abc")), "abc");
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(true)), "true");
    }
}
