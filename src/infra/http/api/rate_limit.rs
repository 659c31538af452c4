use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// Sliding-window request limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct ApiRateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
}

impl ApiRateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            buckets: Arc::new(DashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let window = self.window;

        let mut entry = self.buckets.entry(key.to_string()).or_default();
        entry.retain(|instant| now.duration_since(*instant) < window);

        let remaining = self.max_requests.saturating_sub(entry.len() as u32);
        if remaining == 0 {
            let oldest = entry.first().copied().unwrap_or(now);
            let reset_in = window.saturating_sub(now.duration_since(oldest));
            return RateDecision::Limited {
                retry_after_secs: reset_in.as_secs().max(1),
            };
        }

        entry.push(now);
        RateDecision::Allowed {
            remaining: remaining.saturating_sub(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_after_ceiling_and_recovers_after_window() {
        let limiter = ApiRateLimiter::new(Duration::from_secs(10), 2);
        let start = Instant::now();

        assert_eq!(
            limiter.check_at("10.0.0.1", start),
            RateDecision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_at("10.0.0.1", start),
            RateDecision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            limiter.check_at("10.0.0.1", start + Duration::from_secs(4)),
            RateDecision::Limited {
                retry_after_secs: 6
            }
        ));

        // Other clients have their own bucket.
        assert!(matches!(
            limiter.check_at("10.0.0.2", start),
            RateDecision::Allowed { .. }
        ));

        assert!(matches!(
            limiter.check_at("10.0.0.1", start + Duration::from_secs(11)),
            RateDecision::Allowed { .. }
        ));
    }
}
