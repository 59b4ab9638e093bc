use dashmap::DashMap;
use std::time::{Duration, Instant};

// Sweep the whole map once the number of tracked keys passes this.
const GC_KEY_THRESHOLD: usize = 1000;

// Sliding-window rate limiter - tracks admission timestamps per client key.
// The DashMap entry lock makes the per-key check-and-insert atomic, so two
// concurrent requests at the boundary can't both slip under the limit.
pub struct RateLimiter {
    entries: DashMap<String, Vec<Instant>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    // true = admitted (and recorded), false = over the limit
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }

    fn admit_at(&self, key: &str, now: Instant) -> bool {
        let admitted = {
            let mut stamps = self.entries.entry(key.to_string()).or_default();
            stamps.retain(|&t| now.duration_since(t) < self.window);
            if stamps.len() >= self.max_requests as usize {
                false
            } else {
                stamps.push(now);
                true
            }
        };

        if self.entries.len() > GC_KEY_THRESHOLD {
            self.gc(now);
        }

        admitted
    }

    // Drop every key whose timestamps have all aged out of the window.
    fn gc(&self, now: Instant) {
        self.entries.retain(|_, stamps| {
            stamps.retain(|&t| now.duration_since(t) < self.window);
            !stamps.is_empty()
        });
    }
}
