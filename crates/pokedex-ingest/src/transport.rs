//! Single-attempt JSON fetches

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::{ExtractError, FetchError, FetchErrorKind};

/// Fetches one resource and decodes it as JSON.
///
/// Implementations make exactly one attempt and report every failure as a
/// [`FetchError`]; callers decide whether a failure is fatal.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Value, FetchError>;
}

/// HTTP transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ExtractConfig) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, locator: &str) -> Result<Value, FetchError> {
        debug!(locator = %locator, "GET");

        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| FetchError::new(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(locator, FetchErrorKind::Status(status.as_u16())));
        }

        let body = response.bytes().await.map_err(|e| FetchError::new(locator, e))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::new(locator, e))
    }
}
