//! HTTP client for the record store
//!
//! Talks to the store's REST API over reqwest. No retry logic lives here:
//! a failed round-trip aborts the audit run, and re-running the audit is the
//! documented recovery path.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::{RecordStore, Result, StoreError};
use crate::model::{HealthReport, PackageConfig};

/// Configuration for the record store client
#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    /// Base URL of the record store API
    pub base_url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// API key sent as `X-Api-Key`; omitted entirely when unset
    pub api_key: Option<String>,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            api_key: None,
        }
    }
}

/// Envelope the store wraps collection listings in
#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<PackageConfig>,
}

/// reqwest-backed implementation of `RecordStore`
pub struct HttpRecordStore {
    client: Client,
    config: RecordStoreConfig,
}

impl HttpRecordStore {
    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(RecordStoreConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create a client with explicit configuration
    pub fn with_config(config: RecordStoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Start building a client
    pub fn builder() -> HttpRecordStoreBuilder {
        HttpRecordStoreBuilder::new()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the request timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("X-Api-Key", key),
            None => request,
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn error_for_status(response: reqwest::Response, id: Option<&str>) -> StoreError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return StoreError::RecordNotFound { id: id.to_string() };
            }
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            StoreError::Rejected(format!("{}: {}", status, body))
        } else {
            StoreError::Http(format!("{}: {}", status, body))
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_package_configs(&self) -> Result<Vec<PackageConfig>> {
        let url = format!("{}/api/v1/package-configs", self.config.base_url);
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response, None).await);
        }

        let listing: ListResponse = Self::parse_json(response).await?;
        tracing::debug!(count = listing.items.len(), "Listed package configurations");
        Ok(listing.items)
    }

    async fn update_package_config(
        &self,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<PackageConfig> {
        let url = format!("{}/api/v1/package-configs/{}", self.config.base_url, id);
        let response = self
            .authed(self.client.patch(&url))
            .json(&Value::Object(fields))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response, Some(id)).await);
        }

        Self::parse_json(response).await
    }

    async fn create_health_report(&self, report: &HealthReport) -> Result<HealthReport> {
        let url = format!("{}/api/v1/health-reports", self.config.base_url);
        let response = self
            .authed(self.client.post(&url))
            .json(report)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response, None).await);
        }

        Self::parse_json(response).await
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.authed(self.client.get(&url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Record store health check failed");
                false
            }
        }
    }
}

/// Builder for `HttpRecordStore`
pub struct HttpRecordStoreBuilder {
    config: RecordStoreConfig,
}

impl HttpRecordStoreBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RecordStoreConfig::default(),
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.config.timeout_ms = timeout;
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Build the client
    pub fn build(self) -> HttpRecordStore {
        HttpRecordStore::with_config(self.config)
    }
}

impl Default for HttpRecordStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
