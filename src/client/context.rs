// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Execution context: cancellation and deadlines for a call

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::resolve::OptionResolver;
use crate::error::{Error, Result};

/// Cancellation signal plus an optional deadline
///
/// Cloning shares the underlying token: cancelling any clone cancels all of
/// them.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

/// Releases a derived context when dropped
///
/// Dropping the guard cancels the context it was created with, so nothing
/// waiting on that context outlives the call.
#[derive(Debug)]
pub struct ContextGuard {
    _guard: DropGuard,
}

impl ExecutionContext {
    /// Context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
            timeout: None,
        }
    }

    /// Context with a deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> (Self, ContextGuard) {
        Self::background().child_with_timeout(timeout)
    }

    /// Child context that is cancelled with its parent and expires after `timeout`
    pub fn child_with_timeout(&self, timeout: Duration) -> (Self, ContextGuard) {
        let deadline = Instant::now() + timeout;
        let child = Self {
            token: self.token.child_token(),
            deadline: Some(self.deadline.map_or(deadline, |d| d.min(deadline))),
            timeout: Some(timeout),
        };
        let guard = ContextGuard {
            _guard: child.token.clone().drop_guard(),
        };
        (child, guard)
    }

    /// Cancel this context and every child
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Underlying cancellation token
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Drive `fut` to completion unless the context is cancelled or expires first
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled { url: None });
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled { url: None }),
            _ = deadline_elapsed(self.deadline) => {
                let ms = self.timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
                Err(Error::timeout("request", ms))
            }
            output = fut => Ok(output),
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::background()
    }
}

async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Derive the context for one call.
///
/// A caller supplied context is returned as is and no guard is produced: the
/// caller owns its lifetime. Otherwise the effective timeout decides between a
/// background context (no limit) and a deadline bound one.
pub fn derive_context(resolver: &OptionResolver<'_>) -> (ExecutionContext, Option<ContextGuard>) {
    if let Some(context) = resolver.call().context.clone() {
        return (context, None);
    }

    match resolver.timeout() {
        None => (ExecutionContext::background(), None),
        Some(timeout) => {
            let (context, guard) = ExecutionContext::with_timeout(timeout);
            (context, Some(guard))
        }
    }
}
