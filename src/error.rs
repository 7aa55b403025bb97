//! Error taxonomy shared by the request pipeline and the converter.
//!
//! Fallible functions in this crate return `anyhow::Result`. The typed errors
//! below travel inside `anyhow::Error` and can be recovered with
//! `downcast_ref`, so callers can tell a cancelled call apart from a server
//! problem without string matching.

use reqwest::StatusCode;
use std::fmt;

/// The stage of a call in which an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Validation,
    RateLimitWait,
    Backoff,
    Network,
    Encode,
    Decode,
    Application,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Validation => write!(f, "validation"),
            Phase::RateLimitWait => write!(f, "rate-limit wait"),
            Phase::Backoff => write!(f, "backoff"),
            Phase::Network => write!(f, "network"),
            Phase::Encode => write!(f, "encode"),
            Phase::Decode => write!(f, "decode"),
            Phase::Application => write!(f, "application"),
        }
    }
}

/// Structured error reported by the Telegraph API.
///
/// `code` is 0 when the server did not supply one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiError {
    pub code: i64,
    pub description: String,
}

impl ApiError {
    pub fn new(code: i64, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code != 0 {
            write!(
                f,
                "{}: Telegraph API error (code {}): {}",
                Phase::Application,
                self.code,
                self.description
            )
        } else {
            write!(
                f,
                "{}: Telegraph API error: {}",
                Phase::Application,
                self.description
            )
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors raised by the client itself rather than by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request failed schema checks and was never sent.
    Validation(String),
    /// The caller's cancellation token fired while the call was suspended.
    Cancelled(Phase),
    /// The caller's deadline passed while the call was suspended.
    DeadlineExceeded(Phase),
    /// Every attempt hit a transient failure. Attached as context over the last cause.
    RetriesExhausted { attempts: u32 },
    /// The server answered with a status worth retrying (5xx or 429).
    RetryableStatus(StatusCode),
    /// The request body could not be serialized.
    Encode,
    /// A response body did not have the expected shape.
    Decode(&'static str),
    /// The client configuration was rejected at construction.
    InvalidConfig(String),
}

impl ClientError {
    pub fn phase(&self) -> Phase {
        match self {
            ClientError::Validation(_) => Phase::Validation,
            ClientError::Cancelled(phase) | ClientError::DeadlineExceeded(phase) => *phase,
            ClientError::RetriesExhausted { .. } | ClientError::RetryableStatus(_) => {
                Phase::Network
            }
            ClientError::Encode => Phase::Encode,
            ClientError::Decode(_) => Phase::Decode,
            ClientError::InvalidConfig(_) => Phase::Validation,
        }
    }

    /// True for errors caused by the caller giving up, not by the server.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ClientError::Cancelled(_) | ClientError::DeadlineExceeded(_)
        )
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = self.phase();
        match self {
            ClientError::Validation(msg) => write!(f, "{}: {}", phase, msg),
            ClientError::Cancelled(_) => write!(f, "{}: operation cancelled", phase),
            ClientError::DeadlineExceeded(_) => write!(f, "{}: deadline exceeded", phase),
            ClientError::RetriesExhausted { attempts } => {
                write!(f, "{}: request failed after {} attempts", phase, attempts)
            }
            ClientError::RetryableStatus(status) => {
                write!(f, "{}: received status code {}", phase, status.as_u16())
            }
            ClientError::Encode => write!(f, "{}: failed to serialize request body", phase),
            ClientError::Decode(what) => write!(f, "{}: failed to decode {}", phase, what),
            ClientError::InvalidConfig(msg) => {
                write!(f, "{}: invalid client configuration: {}", phase, msg)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Checks whether an error chain was caused by cancellation or a deadline.
pub fn is_cancellation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_cancellation)
    })
}

/// Errors raised while converting markup into content nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The input held no markup at all.
    EmptyDocument,
    /// A built-in CSS selector failed to parse.
    InvalidSelector(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::EmptyDocument => {
                write!(f, "failed to parse HTML: document has no markup")
            }
            ConvertError::InvalidSelector(msg) => write!(f, "invalid selector: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {}
