// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Redirect policy bound to one call

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::redirect::{Attempt, Policy};
use tracing::{debug, trace};

use super::{DEFAULT_MAX_REDIRECTS, NO_REDIRECTS};

/// Bounds how many requests a redirect chain may issue
///
/// The count includes the original request. Once it reaches the bound the
/// redirect response itself is returned to the caller as a normal response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectPolicy {
    max_redirects: i64,
}

impl RedirectPolicy {
    /// Policy for a resolved max-redirects value
    pub fn new(max_redirects: i64) -> Self {
        Self { max_redirects }
    }

    /// Policy that never follows a redirect
    pub fn none() -> Self {
        Self::new(NO_REDIRECTS)
    }

    /// Bound in effect
    pub fn max_redirects(&self) -> i64 {
        self.max_redirects
    }

    /// Whether to follow a redirect after `previous` requests in the chain
    pub fn should_follow(&self, previous: usize) -> bool {
        self.max_redirects != NO_REDIRECTS && (previous as i64) < self.max_redirects
    }

    fn check(&self, attempt: Attempt) -> reqwest::redirect::Action {
        let previous = attempt.previous().len();
        if self.should_follow(previous) {
            trace!(url = %attempt.url(), previous, "Following redirect");
            attempt.follow()
        } else {
            debug!(
                url = %attempt.url(),
                previous,
                max_redirects = self.max_redirects,
                "Redirect limit reached, returning last response"
            );
            attempt.stop()
        }
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REDIRECTS)
    }
}

/// Transport-level policy that consults `slot` on every redirect
///
/// The slot is rewritten each time the owning transport is checked out, so a
/// single pooled client serves calls with different bounds.
pub(crate) fn shared_policy(slot: Arc<RwLock<RedirectPolicy>>) -> Policy {
    Policy::custom(move |attempt| {
        let policy = *slot.read();
        policy.check(attempt)
    })
}
