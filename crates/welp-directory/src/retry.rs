//! Spacing of repeated directory requests.

use std::time::Duration;

use welp_core::AppConfig;

/// How many times a transient directory failure is retried and how long to
/// wait in between.
///
/// The wait before retry `n` is drawn from `[d/2, d]` where
/// `d = min(base * 2^(n-1), cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base: Duration,
    cap: Duration,
}

impl RetryPolicy {
    /// A single attempt with no retries.
    pub const NONE: Self = Self {
        max_retries: 0,
        base: Duration::ZERO,
        cap: Duration::ZERO,
    };

    #[must_use]
    pub fn new(max_retries: u32, base: Duration, cap: Duration) -> Self {
        Self {
            max_retries,
            base,
            cap: cap.max(base),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.directory_max_retries,
            Duration::from_millis(config.directory_backoff_base_ms),
            Duration::from_millis(config.directory_backoff_cap_ms),
        )
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound of the wait before retry number `retry` (1-based).
    pub(crate) fn ceiling(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Wait before retry number `retry`, with half of it randomized so
    /// concurrent clients drift apart.
    pub(crate) fn delay(&self, retry: u32) -> Duration {
        let half = self.ceiling(retry) / 2;
        half + half.mul_f64(rand::random::<f64>())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}
