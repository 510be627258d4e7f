//! Simulated work.

use rand::Rng;
use std::time::Duration;

/// Whether handlers sleep to imitate real work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Latency {
    /// Sleep for a random time in each handler's range.
    #[default]
    Simulated,
    /// Return immediately.
    Disabled,
}

impl Latency {
    /// `Simulated` when `enabled`, otherwise `Disabled`.
    #[must_use]
    pub const fn from_flag(enabled: bool) -> Self {
        if enabled {
            Self::Simulated
        } else {
            Self::Disabled
        }
    }

    /// Sleep for `base_ms` plus up to `jitter_ms` milliseconds.
    pub(crate) async fn pause(self, base_ms: u64, jitter_ms: u64) {
        if let Some(delay) = self.delay(base_ms, jitter_ms) {
            tokio::time::sleep(delay).await;
        }
    }

    fn delay(self, base_ms: u64, jitter_ms: u64) -> Option<Duration> {
        match self {
            Self::Disabled => None,
            Self::Simulated => {
                let jitter = if jitter_ms == 0 {
                    0
                } else {
                    rand::thread_rng().gen_range(0..jitter_ms)
                };
                Some(Duration::from_millis(base_ms.saturating_add(jitter)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_range() {
        for _ in 0..100 {
            let delay = Latency::Simulated.delay(50, 100).unwrap();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay < Duration::from_millis(150));
        }
    }

    #[test]
    fn test_disabled_has_no_delay() {
        assert_eq!(Latency::Disabled.delay(50, 100), None);
        assert_eq!(Latency::from_flag(false), Latency::Disabled);
    }

    #[test]
    fn test_zero_jitter() {
        assert_eq!(
            Latency::Simulated.delay(10, 0),
            Some(Duration::from_millis(10))
        );
    }
}
