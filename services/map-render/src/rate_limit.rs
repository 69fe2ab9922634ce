//! Per-user sliding-window rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Remembers recent calls per user and refuses calls over the limit.
///
/// Each call is stamped at `now + extra`; a heavy call (many elements) can
/// be given extra weight so it lingers in the window longer. Stamps at or
/// before `now - window` are evicted on every check, and users left with no
/// calls are forgotten.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_calls: usize,
    history: HashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_calls: usize) -> Self {
        Self {
            window,
            max_calls,
            history: HashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_calls)
    }

    /// Record a call and report whether it is within the limit.
    pub fn check(&mut self, user: &str, extra: Duration) -> bool {
        self.check_at(user, extra, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    ///
    /// Over-limit calls are still recorded, so hammering keeps a user locked
    /// out until the window drains.
    pub fn check_at(&mut self, user: &str, extra: Duration, now: Instant) -> bool {
        self.prune(now);

        let calls = self.history.entry(user.to_string()).or_default();
        calls.push(now + extra);
        let count = calls.len();

        let allowed = count <= self.max_calls;
        tracing::debug!(
            user,
            calls = count,
            allowed,
            users = self.history.len(),
            "Rate limit check"
        );
        allowed
    }

    /// Calls currently counted against `user`.
    pub fn recent_calls(&self, user: &str) -> usize {
        self.history.get(user).map_or(0, Vec::len)
    }

    /// Drop users whose every call has left the window.
    pub fn prune(&mut self, now: Instant) {
        if let Some(cutoff) = now.checked_sub(self.window) {
            self.history.retain(|_, calls| {
                calls.retain(|&stamp| stamp > cutoff);
                !calls.is_empty()
            });
        }
    }
}
