//! Client configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Url};

use crate::error::ClientError;
use crate::http::{RateLimitPolicy, RetryPolicy};

/// Telegraph API endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.telegra.ph";

/// Transport timeout for a single HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Static user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("telegraph-rs/", env!("CARGO_PKG_VERSION"));

/// Everything a [`crate::Telegraph`] client needs, fixed at construction.
///
/// Defaults: `base_url` = [`DEFAULT_BASE_URL`], `timeout` = 30s,
/// `user_agent` = [`DEFAULT_USER_AGENT`], no custom transport, 10 requests per
/// second with a burst of 10, and 3 retries backing off from 100ms to at most 5s.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied only when the client builds its own transport.
    pub timeout: Duration,
    pub user_agent: String,
    /// Custom transport handle. When `None`, one is built from `timeout` and `user_agent`.
    pub http_client: Option<Client>,
    pub rate_limit: RateLimitPolicy,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
            rate_limit: RateLimitPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Rejects settings the client cannot run with.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("base URL {:?}: {}", self.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.user_agent.is_empty() {
            return Err(ClientError::InvalidConfig(
                "user agent must not be empty".to_string(),
            ));
        }
        self.rate_limit.validate()?;
        self.retry.validate()?;
        Ok(())
    }

    /// Returns the configured transport, building one if none was supplied.
    pub(crate) fn http_client(&self) -> Result<Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }
        debug!(
            "Building HTTP client (timeout {:?}, user agent {})",
            self.timeout, self.user_agent
        );
        Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}
