use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Token-bucket limiter keyed by submission identifier. A brute-force
/// verification can pin a core for seconds, so the cap here is what keeps
/// one caller from monopolizing the worker pool.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, Bucket>>>,
    capacity: f64,
    tokens_per_second: f64,
}

struct Bucket {
    level: f64,
    touched: Instant,
}

impl Bucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            level: capacity,
            touched: now,
        }
    }

    /// Credit tokens earned since the last touch, clamped to capacity.
    fn refill(&mut self, rate: f64, capacity: f64, now: Instant) {
        let earned = now.duration_since(self.touched).as_secs_f64() * rate;
        self.level = capacity.min(self.level + earned);
        self.touched = now;
    }
}

impl RateLimiter {
    pub fn new(burst: u32, per_minute: u32) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            capacity: f64::from(burst),
            tokens_per_second: f64::from(per_minute) / 60.0,
        }
    }

    /// Spend one token from `key`'s bucket; false means the caller is over
    /// its budget.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket::full(self.capacity, now));
        bucket.refill(self.tokens_per_second, self.capacity, now);

        if bucket.level < 1.0 {
            return false;
        }
        bucket.level -= 1.0;
        true
    }

    /// Drop buckets idle for more than 10 minutes.
    pub async fn cleanup(&self) {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        buckets.retain(|_, b| now.duration_since(b.touched).as_secs() < 600);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_is_capped_per_key() {
        let limiter = RateLimiter::new(2, 60);
        assert!(limiter.check("+15550001111").await);
        assert!(limiter.check("+15550001111").await);
        assert!(!limiter.check("+15550001111").await);
        // Other identifiers have their own bucket.
        assert!(limiter.check("+15550002222").await);
    }

    #[tokio::test]
    async fn refill_never_exceeds_capacity() {
        let limiter = RateLimiter::new(1, 600);
        assert!(limiter.check("+15550001111").await);
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        // 10 tokens/s for 200ms earns 2 tokens, but the bucket holds 1.
        assert!(limiter.check("+15550001111").await);
        assert!(!limiter.check("+15550001111").await);
    }
}
