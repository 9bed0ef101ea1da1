use std::time::Duration;

use chrono::{DateTime, Utc};

/// Floor applied to provider-supplied cooldowns so a zero or garbled
/// rate-limit header cannot produce a tight retry loop.
pub const MIN_PROVIDER_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Exponential backoff: `base * 2^(attempts - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(5),
            max: Duration::from_secs(300),
        }
    }
}

impl BackoffPolicy {
    pub fn next_delay(&self, attempt_count: u32) -> Duration {
        let exponent = attempt_count.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max)
            .min(self.max)
    }

    pub fn provider_delay(delay: Duration) -> Duration {
        delay.max(MIN_PROVIDER_DELAY)
    }

    /// Provider cooldown wins over the computed backoff when present.
    pub fn next_attempt_at(
        &self,
        now: DateTime<Utc>,
        attempt_count: u32,
        provider_delay: Option<Duration>,
    ) -> DateTime<Utc> {
        let delay = match provider_delay {
            Some(delay) => Self::provider_delay(delay),
            None => self.next_delay(attempt_count),
        };
        chrono::Duration::from_std(delay)
            .ok()
            .and_then(|delay| now.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub dead_letter_on_permanent_failure: bool,
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dead_letter_on_permanent_failure: false,
            backoff: BackoffPolicy::default(),
        }
    }
}
