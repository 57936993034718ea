//! Adaptive backoff applied before each sink write.

use std::time::Duration;

use serde::Deserialize;

/// Backoff tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BackoffPolicy {
    /// Delay added after a rate-limited write.
    pub step_ms: u64,
    /// Upper bound on the delay.
    pub max_delay_ms: u64,
    /// Delay removed after a successful write.
    pub decay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            step_ms: 5_000,
            max_delay_ms: 20_000,
            decay_ms: 1_000,
        }
    }
}

/// Current throttle delay. Owned by the sync engine.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    policy: BackoffPolicy,
    current_delay_ms: u64,
}

impl RateLimitState {
    #[must_use]
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn current_delay_ms(&self) -> u64 {
        self.current_delay_ms
    }

    /// Pause to apply before the next write.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        Duration::from_millis(self.current_delay_ms)
    }

    /// Decay toward zero after a successful write.
    pub fn record_success(&mut self) {
        self.current_delay_ms = self.current_delay_ms.saturating_sub(self.policy.decay_ms);
    }

    /// Back off after a rate-limited write, capped at the policy maximum.
    pub fn record_rate_limited(&mut self) {
        self.current_delay_ms = self
            .current_delay_ms
            .saturating_add(self.policy.step_ms)
            .min(self.policy.max_delay_ms);
    }
}
