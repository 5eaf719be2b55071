use rand::Rng;
use std::time::Duration;

/// Bounds of the random pause between two successive sends, in milliseconds (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

impl ThrottleConfig {
    /// Builds a config; bounds given in the wrong order are swapped.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: min_delay_ms.max(max_delay_ms),
        }
    }

    /// Draws a delay uniformly from `[min_delay_ms, max_delay_ms]`.
    pub fn next_delay(&self) -> Duration {
        let ms = if self.min_delay_ms >= self.max_delay_ms {
            self.min_delay_ms
        } else {
            rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms)
        };
        Duration::from_millis(ms)
    }
}
