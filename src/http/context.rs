//! Per-call cancellation and deadline handling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Phase};

/// Why a call stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

impl Interrupt {
    pub fn into_error(self, phase: Phase) -> ClientError {
        match self {
            Interrupt::Cancelled => ClientError::Cancelled(phase),
            Interrupt::DeadlineExceeded => ClientError::DeadlineExceeded(phase),
        }
    }
}

/// Cancellation signal passed down through every suspension point of a call.
///
/// Cloning shares the underlying token, so cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never fires unless [`CallContext::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets the deadline to `timeout` from now, keeping an earlier deadline if present.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the interrupt if the context has already fired.
    pub fn check(&self) -> Option<Interrupt> {
        if self.token.is_cancelled() {
            return Some(Interrupt::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interrupt::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the token is cancelled or the deadline passes.
    pub async fn interrupted(&self) -> Interrupt {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.token.cancelled() => Interrupt::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Interrupt::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Interrupt::Cancelled
            }
        }
    }

    /// Drives `future` to completion unless the context fires first.
    pub async fn run<F>(&self, phase: Phase, future: F) -> Result<F::Output, ClientError>
    where
        F: Future,
    {
        if let Some(interrupt) = self.check() {
            return Err(interrupt.into_error(phase));
        }
        tokio::select! {
            biased;
            interrupt = self.interrupted() => Err(interrupt.into_error(phase)),
            output = future => Ok(output),
        }
    }
}
