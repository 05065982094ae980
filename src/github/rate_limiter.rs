use reqwest::header::HeaderMap;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Honors GitHub's `x-ratelimit-*` headers and keeps a soft per-minute
/// request budget on top.
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
    requests_per_minute: u32,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            }),
            requests_per_minute: requests_per_minute.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        if state.remaining == 0 {
            if let Some(reset_at) = state.reset_at {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::warn!("GitHub rate limit exhausted, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                }
                state.remaining = 1;
                state.reset_at = None;
            }
        }

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= self.requests_per_minute {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                drop(state);
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state = self.state.lock().await;
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let header_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        let Some(remaining) = header_u64("x-ratelimit-remaining") else {
            return;
        };

        let mut state = self.state.lock().await;
        state.remaining = remaining.min(u32::MAX as u64) as u32;
        if let Some(reset_timestamp) = header_u64("x-ratelimit-reset") {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            state.reset_at = (reset_timestamp > now)
                .then(|| Instant::now() + Duration::from_secs(reset_timestamp - now));
        }
        if remaining == 0 {
            tracing::warn!("GitHub rate limit reached");
        }
    }

    pub async fn remaining(&self) -> u32 {
        self.state.lock().await.remaining
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[tokio::test]
    async fn test_update_from_headers() {
        let limiter = RateLimiter::new(30);
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));
        limiter.update_from_headers(&headers).await;
        assert_eq!(limiter.remaining().await, 42);

        // Missing header leaves state untouched
        limiter.update_from_headers(&HeaderMap::new()).await;
        assert_eq!(limiter.remaining().await, 42);
    }

    #[tokio::test]
    async fn test_wait_counts_requests() {
        let limiter = RateLimiter::new(5);
        for _ in 0..5 {
            limiter.wait().await;
        }
        assert_eq!(limiter.state.lock().await.requests_this_minute, 5);
    }
}
