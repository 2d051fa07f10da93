//! Request counter for the static file server.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared hit counter. Cloning shares the same count.
#[derive(Clone, Debug, Default)]
pub struct HitCounter {
    hits: Arc<AtomicU64>,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// Middleware that counts every request passing through it.
pub async fn count_hits(State(counter): State<HitCounter>, request: Request, next: Next) -> Response {
    counter.increment();
    next.run(request).await
}
