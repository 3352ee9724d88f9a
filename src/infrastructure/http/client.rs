//! HTTP adapter for the call backend

use crate::domain::call::backend::CallBackend;
use crate::domain::call::entity::CallRecord;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use crate::infrastructure::http::wire::{WireCallRecord, WireRecordList};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the call backend
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL, e.g. `https://api.autopulse.example`
    pub base_url: String,
    /// Workspace API key, sent as a bearer token when present
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

/// [`CallBackend`] implementation over the platform's HTTP API
pub struct HttpCallBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCallBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    /// Pull a human-readable message out of an error body, if any
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        }
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(error: reqwest::Error) -> Self {
        DomainError::Network(error.to_string())
    }
}

#[async_trait]
impl CallBackend for HttpCallBackend {
    async fn dial(&self, id: &RecordId) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("/calls/{}/dial", id))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(record_id = %id, "Dial accepted");
            return Ok(());
        }

        let message = Self::error_message(response).await;
        if status.is_client_error() {
            Err(DomainError::Rejected(message))
        } else {
            Err(DomainError::Network(format!(
                "Backend returned {}: {}",
                status, message
            )))
        }
    }

    async fn fetch_status(&self, id: &RecordId) -> Result<CallRecord> {
        let response = self
            .request(reqwest::Method::GET, &format!("/calls/{}", id))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(DomainError::Network(format!(
                "Status check returned {}",
                status
            )));
        }

        let wire: WireCallRecord = response.json().await?;
        wire.into_record()
    }

    async fn list_records(&self) -> Result<Vec<CallRecord>> {
        let response = self.request(reqwest::Method::GET, "/calls").send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Network(format!(
                "Record listing returned {}",
                status
            )));
        }

        let wire: WireRecordList = response.json().await?;
        wire.into_records()
    }
}
