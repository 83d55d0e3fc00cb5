use chrono::{DateTime, Utc};
use mirror_core::RateLimitStatus;
use std::time::Duration;

use crate::run_log::RunLog;

/// Pause between repositories: a fixed floor, stretched to the quota reset
/// when a host reports it is close to its rate limit.
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    min_remaining: Option<u64>,
    max_wait: Duration,
}

impl Throttle {
    pub fn new(delay: Duration, min_remaining: Option<u64>, max_wait: Duration) -> Self {
        Self {
            delay,
            min_remaining,
            max_wait,
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, None, Duration::ZERO)
    }

    /// Time to wait for the most constrained quota, if any is at or below
    /// the threshold
    pub fn quota_wait(
        &self,
        quotas: &[Option<RateLimitStatus>],
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        let threshold = self.min_remaining?;

        quotas
            .iter()
            .flatten()
            .filter(|quota| quota.remaining <= threshold)
            .map(|quota| {
                (quota.reset - now)
                    .to_std()
                    .unwrap_or(Duration::ZERO)
                    .min(self.max_wait)
            })
            .max()
    }

    pub fn wait_duration(&self, quotas: &[Option<RateLimitStatus>], now: DateTime<Utc>) -> Duration {
        self.quota_wait(quotas, now)
            .map_or(self.delay, |wait| wait.max(self.delay))
    }

    /// Sleep before the next repository
    pub fn pause(&self, quotas: &[Option<RateLimitStatus>], log: &mut RunLog) {
        let now = Utc::now();
        if let Some(wait) = self.quota_wait(quotas, now).filter(|w| *w > self.delay) {
            log.warning(format!(
                "API quota nearly exhausted, waiting {}s for the rate limit to reset",
                wait.as_secs()
            ));
        }

        let wait = self.wait_duration(quotas, now);
        if !wait.is_zero() {
            tracing::trace!(wait_ms = wait.as_millis() as u64, "throttling");
            std::thread::sleep(wait);
        }
    }
}
