//! Reconnection Backoff
//!
//! Delay policy applied between feed sessions. The default is a fixed
//! five-second delay repeated forever; exponential growth, a delay cap,
//! jitter, and an attempt limit are all available through
//! configuration.

use std::time::Duration;

use rand::Rng;

/// Configuration for the backoff policy.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Growth factor applied after each attempt; 1.0 keeps the delay
    /// fixed. Values below 1.0 are treated as 1.0.
    pub multiplier: f64,
    /// Randomization as a fraction of the delay (0.1 = ±10%).
    pub jitter_factor: f64,
    /// Maximum attempts before giving up (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(5),
            multiplier: 1.0,
            jitter_factor: 0.0,
            max_attempts: 0,
        }
    }
}

/// Stateful delay sequence for one reconnect loop.
#[derive(Debug)]
pub struct BackoffPolicy {
    config: BackoffConfig,
    current_delay: Duration,
    attempt_count: u32,
}

impl BackoffPolicy {
    /// Create a policy starting at the configured initial delay.
    #[must_use]
    pub const fn new(config: BackoffConfig) -> Self {
        let current_delay = config.initial_delay;
        Self {
            config,
            current_delay,
            attempt_count: 0,
        }
    }

    /// Next delay to sleep before reconnecting, or `None` once the
    /// attempt limit is exhausted.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.config.max_attempts > 0 && self.attempt_count >= self.config.max_attempts {
            return None;
        }

        self.attempt_count += 1;
        let delay = self.jittered(self.current_delay);

        let grown = self.current_delay.mul_f64(self.config.multiplier.max(1.0));
        self.current_delay = grown.min(self.config.max_delay);

        Some(delay)
    }

    /// Reset after a healthy session so the next failure starts from
    /// the initial delay again.
    pub const fn reset(&mut self) {
        self.current_delay = self.config.initial_delay;
        self.attempt_count = 0;
    }

    /// Attempts taken since the last reset.
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Whether another attempt is permitted.
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        self.config.max_attempts == 0 || self.attempt_count < self.config.max_attempts
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 {
            return delay;
        }

        let spread = delay.mul_f64(self.config.jitter_factor);
        let spread_ms = spread.as_millis().min(u128::from(u64::MAX)) as u64;
        if spread_ms == 0 {
            return delay;
        }

        let offset = rand::rng().random_range(0..=spread_ms * 2);
        let low = delay.saturating_sub(spread);
        low + Duration::from_millis(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_five_seconds_forever() {
        let config = BackoffConfig::default();
        let mut policy = BackoffPolicy::new(config);

        for _ in 0..10 {
            assert_eq!(policy.next_delay(), Some(Duration::from_secs(5)));
        }
        assert!(policy.should_retry());
    }

    #[test]
    fn multiplier_grows_delay_exponentially() {
        let mut policy = BackoffPolicy::new(BackoffConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts: 0,
        });

        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(400)));
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(800)));
    }

    #[test]
    fn delay_is_capped_at_max() {
        let mut policy = BackoffPolicy::new(BackoffConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(2),
            multiplier: 4.0,
            jitter_factor: 0.0,
            max_attempts: 0,
        });

        let _ = policy.next_delay();
        assert_eq!(policy.next_delay(), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn sub_unit_multiplier_never_shrinks_delay() {
        let mut policy = BackoffPolicy::new(BackoffConfig {
            multiplier: 0.5,
            ..BackoffConfig::default()
        });

        assert_eq!(policy.next_delay(), Some(Duration::from_secs(5)));
        assert_eq!(policy.next_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn attempt_limit_is_enforced() {
        let mut policy = BackoffPolicy::new(BackoffConfig {
            max_attempts: 2,
            ..BackoffConfig::default()
        });

        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_none());
        assert!(!policy.should_retry());
        assert_eq!(policy.attempt_count(), 2);
    }

    #[test]
    fn reset_restores_initial_delay_and_attempts() {
        let mut policy = BackoffPolicy::new(BackoffConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts: 3,
        });

        let _ = policy.next_delay();
        let _ = policy.next_delay();
        policy.reset();

        assert_eq!(policy.attempt_count(), 0);
        assert!(policy.should_retry());
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        for _ in 0..100 {
            let mut policy = BackoffPolicy::new(BackoffConfig {
                initial_delay: Duration::from_millis(1000),
                max_delay: Duration::from_secs(10),
                multiplier: 1.0,
                jitter_factor: 0.1,
                max_attempts: 0,
            });

            let millis = policy.next_delay().unwrap().as_millis();
            assert!((900..=1100).contains(&millis), "delay {millis}ms out of bounds");
        }
    }
}
