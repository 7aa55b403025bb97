use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::{
    config::ClientConfig,
    http::{RateLimitPolicy, RetryPolicy},
    telegraph::Telegraph,
};

/// Client settings collected from command-line flags and the environment.
///
/// Unset values keep the [`ClientConfig`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub rate_limit: Option<u32>,
    pub max_retries: Option<u32>,
}

impl ClientOptions {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(rate) = self.rate_limit {
            config = config.with_rate_limit(RateLimitPolicy::per_second(rate));
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_retry(RetryPolicy {
                max_retries,
                ..RetryPolicy::default()
            });
        }
        config
    }

    #[tracing::instrument(skip(self))]
    pub fn build(&self) -> Result<Telegraph> {
        let config = self.client_config();
        debug!(
            "Using API {} (timeout {:?}, {} req/s, {} retries)",
            config.base_url, config.timeout, config.rate_limit.capacity, config.retry.max_retries
        );
        Telegraph::new(config)
    }
}

/// Returns the access token or explains how to supply one.
pub fn require_token(token: Option<&str>) -> Result<&str> {
    match token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => anyhow::bail!(
            "An access token is required: pass --token or set TELEGRAPH_ACCESS_TOKEN"
        ),
    }
}
