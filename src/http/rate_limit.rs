//! Token-bucket rate governor shared by every call made through one client.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::debug;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use super::context::CallContext;
use crate::error::{ClientError, Phase};

/// Default bucket capacity and refill rate (requests per second).
pub const DEFAULT_RATE_LIMIT: u32 = 10;

/// Token-bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    /// Maximum number of tokens the bucket holds; also its initial fill.
    pub capacity: u32,
    /// Tokens added per second.
    pub refill_per_second: f64,
}

impl RateLimitPolicy {
    /// Allows `n` requests per second with a burst of `n`.
    pub fn per_second(n: u32) -> Self {
        Self {
            capacity: n,
            refill_per_second: f64::from(n),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.capacity == 0 {
            return Err(ClientError::InvalidConfig(
                "rate limit capacity must be at least 1".to_string(),
            ));
        }
        if !self.refill_per_second.is_finite() || self.refill_per_second <= 0.0 {
            return Err(ClientError::InvalidConfig(format!(
                "rate limit refill rate must be positive, got {}",
                self.refill_per_second
            )));
        }
        Ok(())
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::per_second(DEFAULT_RATE_LIMIT)
    }
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket with FIFO admission.
///
/// Waiters line up on a single-permit semaphore; only the waiter at the head of
/// the line sleeps on the bucket. The bucket mutex is held for the refill and
/// check-and-decrement only, never across an await.
pub struct RateGovernor {
    policy: RateLimitPolicy,
    bucket: Mutex<Bucket>,
    admission: Semaphore,
}

impl RateGovernor {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            bucket: Mutex::new(Bucket {
                tokens: f64::from(policy.capacity),
                last_refill: Instant::now(),
            }),
            admission: Semaphore::new(1),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Waits for one token and consumes it.
    ///
    /// A caller whose context fires while waiting leaves the line without
    /// taking a token.
    pub async fn acquire(&self, ctx: &CallContext) -> Result<()> {
        let _turn = ctx
            .run(Phase::RateLimitWait, self.admission.acquire())
            .await?
            .map_err(|_| anyhow!("{}: rate governor closed", Phase::RateLimitWait))?;

        loop {
            let wait = match self.try_take(Instant::now()) {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };
            debug!("Rate limit reached, waiting {:?} for a token", wait);
            ctx.run(Phase::RateLimitWait, tokio::time::sleep(wait))
                .await?;
        }
    }

    /// Refills from elapsed time and takes a token, or reports how long until one is due.
    fn try_take(&self, now: Instant) -> Result<(), Duration> {
        let mut bucket = match self.bucket.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let capacity = f64::from(self.policy.capacity);
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.policy.refill_per_second).min(capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - bucket.tokens;
            // Saturates for rates so slow the wait overflows a Duration.
            let wait = Duration::try_from_secs_f64(missing / self.policy.refill_per_second)
                .unwrap_or(Duration::MAX);
            // Rounded up: the next check must see a whole token.
            Err(wait.saturating_add(Duration::from_micros(1)))
        }
    }
}
