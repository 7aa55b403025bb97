//! HTTP pipeline: cancellation, rate limiting, retries and response unification.

mod client;
mod context;
mod rate_limit;
mod response;
mod retry;

pub use client::{Dispatcher, Outcome, encode_body};
pub use context::{CallContext, Interrupt};
pub use rate_limit::{DEFAULT_RATE_LIMIT, RateGovernor, RateLimitPolicy};
pub use response::{Envelope, RawResponse, unify};
pub use retry::{
    DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MULTIPLIER,
    RetryPolicy, is_retryable_status,
};
