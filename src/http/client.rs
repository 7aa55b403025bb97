//! Resilient dispatcher: rate limiting, retry with backoff and cancellation.

use std::future::Future;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde::Serialize;

use super::context::CallContext;
use super::rate_limit::RateGovernor;
use super::response::RawResponse;
use super::retry::{RetryPolicy, is_retryable_status};
use crate::config::ClientConfig;
use crate::error::{ClientError, Phase};

/// Result of a single attempt that did not end the call with an error.
#[derive(Debug)]
pub enum Outcome {
    /// The server answered with a final status; the unifier decides success.
    Complete(RawResponse),
    /// A failure worth retrying: transport error, 5xx or 429.
    Transient(anyhow::Error),
}

/// Sends requests to the Telegraph API with rate limiting and bounded retries.
///
/// One dispatcher is shared by all calls made through a client. Calls run
/// concurrently; they only synchronize on the rate governor.
pub struct Dispatcher {
    client: Client,
    base_url: String,
    user_agent: String,
    governor: RateGovernor,
    retry: RetryPolicy,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: config.http_client()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            governor: RateGovernor::new(config.rate_limit),
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Sends `method path` until the server gives a final answer or retries run out.
    ///
    /// `body` must already be JSON; see [`encode_body`].
    #[tracing::instrument(skip(self, ctx, body))]
    pub async fn dispatch(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let url = self.endpoint(path, query)?;
        let operation_name = format!("{} {}", method, path);
        debug!("{} -> {}", operation_name, url);

        self.with_retry(ctx, &operation_name, || {
            self.attempt(ctx, method.clone(), url.clone(), body.as_deref())
        })
        .await
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let path = path.trim_start_matches('/');
        anyhow::ensure!(
            !path.is_empty(),
            "{}: request path must not be empty",
            Phase::Validation
        );

        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .with_context(|| {
                format!("{}: invalid request URL for path {}", Phase::Validation, path)
            })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Runs attempts until one completes, one fails for good, or the policy gives up.
    ///
    /// Before every attempt a token is taken from the rate governor; before
    /// every retry the caller sleeps for the backoff delay.
    async fn with_retry<F, Fut>(
        &self,
        ctx: &CallContext,
        operation_name: &str,
        operation: F,
    ) -> Result<RawResponse>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Outcome>>,
    {
        let max_attempts = self.retry.max_attempts();
        let mut last_error = None;

        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt);
                ctx.run(Phase::Backoff, tokio::time::sleep(delay)).await?;
            }

            self.governor.acquire(ctx).await?;

            match operation().await? {
                Outcome::Complete(raw) => {
                    debug!("{}: completed with status {}", operation_name, raw.status);
                    return Ok(raw);
                }
                Outcome::Transient(e) => {
                    if attempt < self.retry.max_retries {
                        warn!(
                            "{}: attempt {}/{} failed ({:#}), retrying in {:?}...",
                            operation_name,
                            attempt + 1,
                            max_attempts,
                            e,
                            self.retry.delay_for(attempt + 1)
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .unwrap_or_else(|| anyhow!("{}: no attempt was made", operation_name));
        Err(last_error.context(ClientError::RetriesExhausted {
            attempts: max_attempts,
        }))
    }

    /// A single request/response exchange.
    async fn attempt(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        body: Option<&[u8]>,
    ) -> Result<Outcome> {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = match ctx.run(Phase::Network, request.send()).await? {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                let context = format!("{}: failed to build request", Phase::Network);
                return Err(anyhow::Error::from(e).context(context));
            }
            Err(e) => {
                return Ok(Outcome::Transient(
                    anyhow::Error::from(e).context("Failed to send request"),
                ));
            }
        };

        let status = response.status();
        if is_retryable_status(status) {
            return Ok(Outcome::Transient(ClientError::RetryableStatus(status).into()));
        }

        match ctx.run(Phase::Network, response.bytes()).await? {
            Ok(body) => Ok(Outcome::Complete(RawResponse::new(status, body.to_vec()))),
            Err(e) => Ok(Outcome::Transient(
                anyhow::Error::from(e).context("Failed to read response body"),
            )),
        }
    }
}

/// Serializes a request body once, before any attempt is made.
pub fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).context(ClientError::Encode)
}
