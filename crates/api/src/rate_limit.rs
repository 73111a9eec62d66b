use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window request counter keyed by client address.
#[derive(Debug, Clone)]
pub struct ClientRateLimiter {
    inner: Arc<Mutex<LimiterState>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug)]
struct LimiterState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl ClientRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LimiterState {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            window,
            max_requests,
        }
    }

    pub fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }

    fn allow_at(&self, client: &str, now: Instant) -> bool {
        let mut state = self.inner.lock();
        // Clients with nothing left in the window are dropped once per window.
        if now.saturating_duration_since(state.last_sweep) >= self.window {
            let window = self.window;
            state.hits.retain(|_, recent| {
                expire(recent, now, window);
                !recent.is_empty()
            });
            state.last_sweep = now;
        }

        let recent = state.hits.entry(client.to_string()).or_default();
        expire(recent, now, self.window);

        if recent.len() >= self.max_requests {
            return false;
        }
        recent.push_back(now);
        true
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.inner.lock().hits.len()
    }
}

fn expire(recent: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while recent
        .front()
        .is_some_and(|&hit| now.saturating_duration_since(hit) > window)
    {
        recent.pop_front();
    }
}
