//! Per-provider minimum-delay rate limiter.
//!
//! Upstream sources ban clients that hammer them, so every call to the same
//! provider must be separated by a configured minimum delay, globally rather
//! than per symbol. The limiter keeps one "next free slot" instant per provider;
//! acquiring a slot reserves it under the lock and then sleeps outside it,
//! so concurrent callers against the same provider queue up delay-apart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Minimum-interval rate limiter keyed by provider id.
pub struct RateLimiter {
    delay: Duration,
    slots: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing `delay` between calls to one provider.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the slot map, recovering from poison if necessary.
    ///
    /// Worst case after recovery is one under-delayed request, which is
    /// preferable to taking the whole collector down.
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.slots.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Wait until the provider's next free slot, then claim the one after.
    pub async fn acquire(&self, provider: &str) {
        let wait = {
            let mut slots = self.lock_slots();
            let now = Instant::now();

            let slot = slots.entry(provider.to_string()).or_insert(now);
            let scheduled = (*slot).max(now);
            *slot = scheduled + self.delay;

            scheduled.saturating_duration_since(now)
        };

        if wait > Duration::ZERO {
            debug!("Rate limiter: waiting {:?} for provider '{}'", wait, provider);
            tokio::time::sleep(wait).await;
        }
    }
}
