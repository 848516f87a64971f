// =============================================================================
// Request Pacer — keeps price requests at least `interval` apart
// =============================================================================
//
// The chart endpoint is unauthenticated and throttles bursts, so every request
// first reserves the next free slot.  Reservation happens under a short
// `parking_lot` lock; the wait itself is a `tokio` sleep taken after the lock
// is released, so concurrent workers queue up without blocking the runtime.
// =============================================================================

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Reserve the next request slot and return when it begins.
    fn reserve(&self, now: Instant) -> Instant {
        let mut next = self.next_slot.lock();
        let slot = match *next {
            Some(t) if t > now => t,
            _ => now,
        };
        *next = Some(slot + self.interval);
        slot
    }

    /// Wait until this caller may send a request.
    pub async fn acquire(&self) {
        let slot = self.reserve(Instant::now());
        let now = Instant::now();
        if slot > now {
            trace!(wait_ms = (slot - now).as_millis() as u64, "rate limiter waiting");
            tokio::time::sleep_until(slot).await;
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .field("next_slot", &*self.next_slot.lock())
            .finish()
    }
}
