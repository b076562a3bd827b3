//! Hosted table client speaking the PostgREST wire contract

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::io::HttpClient;

/// Handle for querying tables of one hosted backend project.
///
/// Construction is pure: credentials are not validated until the first query.
pub struct TableClient {
    base_url: String,
    api_key: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TableClient {
    /// Connect to a hosted project and return the client handle
    pub fn connect(url: &str, key: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = url.trim_end_matches('/').to_string();
        tracing::debug!("Created TableClient for {}", base_url);
        Self {
            base_url,
            api_key: key.to_string(),
            http,
        }
    }

    /// Identity of the backing project, used as a cache key component
    pub fn identity(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Select all columns of all rows of `table`
    pub async fn select_all<T: DeserializeOwned>(&self, table: &str) -> crate::Result<Vec<T>> {
        let url = format!("{}?select=*", self.table_url(table));
        self.select(&url, table).await
    }

    /// Select all rows of `table` where `column` equals `value`.
    ///
    /// The value is percent-encoded: it may come from user input, and a raw
    /// `&` or `=` would splice extra filter parameters into the query.
    pub async fn select_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> crate::Result<Vec<T>> {
        let mut url = reqwest::Url::parse(&self.table_url(table))
            .map_err(|e| crate::VitrineError::Config(format!("Invalid backend url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair(column, &format!("eq.{}", value));
        self.select(url.as_str(), table).await
    }

    async fn select<T: DeserializeOwned>(&self, url: &str, table: &str) -> crate::Result<Vec<T>> {
        let auth = self.auth_header();
        let headers = [("apikey", self.api_key.as_str()), ("Authorization", auth.as_str())];

        let response = self
            .http
            .get(url, &headers)
            .await
            .map_err(|e| crate::VitrineError::BackendUnavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(crate::VitrineError::BackendUnavailable(format!(
                "Query on table '{}' returned status {}: {}",
                table, response.status, response.body
            )));
        }

        let rows: Vec<T> = serde_json::from_str(&response.body)?;
        tracing::debug!("Fetched {} rows from table '{}'", rows.len(), table);
        Ok(rows)
    }

    /// Insert one row into `table`, returning the stored representation
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> crate::Result<R> {
        let url = self.table_url(table);
        let auth = self.auth_header();
        let headers = [
            ("apikey", self.api_key.as_str()),
            ("Authorization", auth.as_str()),
            ("Prefer", "return=representation"),
        ];
        let body = serde_json::to_string(row)?;

        let response = self
            .http
            .post_json(&url, &headers, &body)
            .await
            .map_err(|e| crate::VitrineError::BackendUnavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(crate::VitrineError::BackendUnavailable(format!(
                "Insert into table '{}' returned status {}: {}",
                table, response.status, response.body
            )));
        }

        // PostgREST returns the inserted rows as an array
        let mut rows: Vec<R> = serde_json::from_str(&response.body)?;
        rows.pop().ok_or_else(|| {
            crate::VitrineError::BackendUnavailable(format!(
                "Insert into table '{}' returned no rows",
                table
            ))
        })
    }
}
