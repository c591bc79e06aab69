use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window limiter: at most `max_per_window` admissions in any
/// trailing 60 second span.
///
/// Each caller reserves its admission time while holding the lock and only
/// then sleeps, so the recorded timestamp is the moment the caller is
/// released and concurrent callers never share a slot.
pub struct RateLimiter {
    max_per_window: Option<usize>,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(requests_per_minute, WINDOW)
    }

    pub fn new(max_per_window: u32, window: Duration) -> Self {
        let max_per_window = if max_per_window == 0 {
            tracing::warn!("Rate limiter initialized with a limit of 0, no rate limiting applied");
            None
        } else {
            Some(max_per_window as usize)
        };
        Self {
            max_per_window,
            window,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn wait(&self) {
        let Some(cap) = self.max_per_window else {
            return;
        };

        let now = Instant::now();
        let admit_at = {
            let mut admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);
            while admitted
                .front()
                .is_some_and(|&t| now.saturating_duration_since(t) >= self.window)
            {
                admitted.pop_front();
            }

            let admit_at = if admitted.len() >= cap {
                (admitted[admitted.len() - cap] + self.window).max(now)
            } else {
                now
            };
            admitted.push_back(admit_at);
            admit_at
        };

        if admit_at > now {
            let wait = admit_at - now;
            tracing::debug!(wait_ms = wait.as_millis(), "Rate limit reached, waiting");
            tokio::time::sleep_until(admit_at).await;
        }
    }

    /// Admissions currently inside the window, reserved ones included.
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        self.admitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < self.window)
            .count()
    }
}
