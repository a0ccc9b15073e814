//! Request pacing: jittered inter-request delay, exponential backoff on
//! rate-limit signals, and a rolling-window request ceiling.
//!
//! The pacer hands out planned send instants under a lock, so concurrent
//! callers are linearized and the global request rate never exceeds the
//! configured ceiling even with a worker pool in front of it. The jittered
//! delay applies between any two requests regardless of outcome; only a
//! rate-limit signal escalates beyond it.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::Settings;

/// Configuration for request pacing.
#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Lower bound of the randomized inter-request delay.
    pub delay_min: Duration,
    /// Upper bound of the randomized inter-request delay.
    pub delay_max: Duration,
    /// Seed delay for exponential backoff, doubling per consecutive
    /// rate-limit signal.
    pub backoff_seed: Duration,
    /// Ceiling for a single backoff sleep.
    pub backoff_max: Duration,
    /// Retries of one unit before rate limiting escalates to fatal.
    pub max_attempts: u32,
    /// Maximum requests per rolling window (0 = unlimited).
    pub max_requests: u32,
    /// Rolling window for the request ceiling.
    pub window: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            delay_min: Duration::from_millis(1_000),
            delay_max: Duration::from_millis(5_000),
            backoff_seed: Duration::from_millis(2_000),
            backoff_max: Duration::from_secs(60),
            max_attempts: 5,
            max_requests: 30,
            window: Duration::from_secs(60),
        }
    }
}

impl From<&Settings> for PacerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            delay_min: Duration::from_millis(settings.delay_min_ms),
            delay_max: Duration::from_millis(settings.delay_max_ms),
            backoff_seed: Duration::from_millis(settings.backoff_seed_ms),
            max_attempts: settings.max_retries,
            max_requests: settings.max_requests_per_minute,
            window: Duration::from_secs(60),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
struct PacerState {
    /// Planned send instant of the most recent reservation.
    last_planned: Option<Instant>,
    /// Planned send instants still relevant to the rolling window,
    /// ascending.
    planned: VecDeque<Instant>,
}

/// Shared request pacer. Cheap to share by reference across workers.
pub struct RequestPacer {
    config: PacerConfig,
    state: Mutex<PacerState>,
}

impl RequestPacer {
    pub fn new(config: PacerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(PacerState::default()),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Exponential backoff delay for the given retry attempt (0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let seed_ms = self.config.backoff_seed.as_millis() as u64;
        let delay_ms = seed_ms.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay_ms).min(self.config.backoff_max)
    }

    /// Reserve the next send slot and return how long the caller must wait.
    /// Reservations are monotone: each planned instant is at least one
    /// jittered delay after the previous one, and never lets more than
    /// `max_requests` land in any rolling window.
    pub fn reserve(&self) -> Duration {
        let mut state = self.state.lock().expect("pacer lock poisoned");
        let now = Instant::now();

        let jitter = self.jitter();
        let mut ready = match state.last_planned {
            Some(last) => (last + jitter).max(now),
            None => now,
        };

        if self.config.max_requests > 0 {
            let cap = self.config.max_requests as usize;
            loop {
                let in_window = match ready.checked_sub(self.config.window) {
                    Some(start) => state.planned.iter().filter(|t| **t > start).count(),
                    None => state.planned.len(),
                };
                if in_window < cap {
                    break;
                }
                // Wait for the earliest conflicting reservation to leave the
                // window.
                let idx = state.planned.len() - in_window;
                ready = state.planned[idx] + self.config.window;
            }
            if let Some(start) = ready.checked_sub(self.config.window) {
                while matches!(state.planned.front(), Some(t) if *t <= start) {
                    state.planned.pop_front();
                }
            }
        }

        state.last_planned = Some(ready);
        state.planned.push_back(ready);
        ready.saturating_duration_since(now)
    }

    /// Wait until the next request may be sent.
    pub async fn pace(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    fn jitter(&self) -> Duration {
        let min = self.config.delay_min;
        let max = self.config.delay_max;
        if max <= min {
            return min;
        }
        let ms = rand::rng().random_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config(max_requests: u32, window_ms: u64) -> PacerConfig {
        PacerConfig {
            delay_min: Duration::ZERO,
            delay_max: Duration::ZERO,
            max_requests,
            window: Duration::from_millis(window_ms),
            ..Default::default()
        }
    }

    #[test]
    fn first_reservation_is_immediate() {
        let pacer = RequestPacer::new(fast_config(0, 0));
        assert_eq!(pacer.reserve(), Duration::ZERO);
    }

    #[test]
    fn jittered_delay_separates_requests() {
        let config = PacerConfig {
            delay_min: Duration::from_millis(50),
            delay_max: Duration::from_millis(80),
            max_requests: 0,
            ..Default::default()
        };
        let pacer = RequestPacer::new(config);
        pacer.reserve();
        let wait = pacer.reserve();
        assert!(wait >= Duration::from_millis(45), "wait was {:?}", wait);
        assert!(wait <= Duration::from_millis(80));
    }

    #[test]
    fn rolling_window_ceiling_holds() {
        let window = Duration::from_millis(100);
        let pacer = RequestPacer::new(fast_config(5, 100));

        let base = Instant::now();
        let mut planned: Vec<Duration> = Vec::new();
        for _ in 0..20 {
            let wait = pacer.reserve();
            planned.push(base.elapsed() + wait);
        }

        // In the planned schedule, any two reservations five slots apart
        // must be separated by at least one full window.
        for pair in planned.windows(6) {
            assert!(
                pair[5] >= pair[0] + window,
                "ceiling violated: {:?} .. {:?}",
                pair[0],
                pair[5]
            );
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let pacer = RequestPacer::new(PacerConfig {
            backoff_seed: Duration::from_millis(100),
            backoff_max: Duration::from_millis(1_000),
            ..fast_config(0, 0)
        });
        assert_eq!(pacer.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(pacer.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(pacer.backoff_delay(2), Duration::from_millis(400));
        assert_eq!(pacer.backoff_delay(10), Duration::from_millis(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_respect_ceiling() {
        let pacer = std::sync::Arc::new(RequestPacer::new(fast_config(4, 50)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let pacer = pacer.clone();
            handles.push(tokio::spawn(async move {
                pacer.pace().await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        // 16 requests at 4 per 50ms cannot finish before three full windows
        // have elapsed.
        assert!(
            start.elapsed() >= Duration::from_millis(140),
            "finished too fast: {:?}",
            start.elapsed()
        );
    }
}
