//! Rolling-window rate limiting for outbound Harvest API requests.
//!
//! The Harvest API allows a fixed number of requests per rolling interval
//! per API key. [`RequestWindow`] enforces that ceiling on the client side:
//! every request reserves a slot before it is sent, and reservations suspend
//! the calling task until the window has capacity. A sliding log of send
//! timestamps is used rather than a token bucket, so the ceiling holds for
//! any rolling interval, not just on average.

#![deny(missing_docs)]

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// A rolling-window request limiter shared by all callers of one API client.
///
/// The check-and-reserve step is serialized under a mutex, so concurrent
/// callers cannot overshoot the limit between the check and the update.
#[derive(Debug)]
pub struct RequestWindow {
    limit: usize,
    interval: Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl RequestWindow {
    /// Create a window allowing `limit` requests per rolling `interval`.
    pub fn new(limit: u32, interval: Duration) -> Self {
        Self {
            limit: limit as usize,
            interval,
            sent: Mutex::new(VecDeque::with_capacity(limit as usize)),
        }
    }

    /// Reserve a send slot, suspending until the window has capacity.
    ///
    /// Returns as soon as the reservation is recorded; the caller should
    /// issue its request immediately afterwards. Only the calling task is
    /// suspended while waiting, never unrelated tasks.
    pub async fn acquire(&self) {
        loop {
            match self.try_acquire().await {
                Ok(()) => return,
                Err(wait) => {
                    log::debug!("Request window full, waiting {wait:?} for capacity");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Attempt to reserve a slot without waiting.
    ///
    /// On a full window, returns the duration until the oldest recorded send
    /// rolls out of the interval.
    async fn try_acquire(&self) -> Result<(), Duration> {
        let mut sent = self.sent.lock().await;
        let now = Instant::now();

        while let Some(&oldest) = sent.front() {
            if now.duration_since(oldest) >= self.interval {
                sent.pop_front();
            } else {
                break;
            }
        }

        if sent.len() < self.limit {
            sent.push_back(now);
            return Ok(());
        }

        // The deque is non-empty here since limit is at least one.
        let wait = sent
            .front()
            .map(|&oldest| self.interval.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(self.interval);

        Err(wait)
    }

    /// Number of slots currently free in the window.
    pub async fn available(&self) -> usize {
        let mut sent = self.sent.lock().await;
        let now = Instant::now();

        while let Some(&oldest) = sent.front() {
            if now.duration_since(oldest) >= self.interval {
                sent.pop_front();
            } else {
                break;
            }
        }

        self.limit - sent.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_window_property(timestamps: &[Instant], limit: usize, interval: Duration) {
        // Any `limit + 1` consecutive sends must span more than the interval.
        for pair in timestamps.windows(limit + 1) {
            let span = pair[limit].duration_since(pair[0]);
            assert!(
                span >= interval,
                "{} sends within {span:?}, window allows {limit} per {interval:?}",
                limit + 1,
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn within_limit_never_waits() {
        let window = RequestWindow::new(5, Duration::from_secs(10));
        let start = Instant::now();

        for _ in 0..5 {
            window.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(window.available().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sixth_request_waits_for_the_window() {
        let window = RequestWindow::new(5, Duration::from_secs(10));

        for _ in 0..5 {
            window.acquire().await;
        }

        let start = Instant::now();
        window.acquire().await;

        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn rolling_window_is_never_exceeded() {
        let window = RequestWindow::new(3, Duration::from_secs(10));
        let mut timestamps = Vec::new();

        for _ in 0..12 {
            window.acquire().await;
            timestamps.push(Instant::now());
        }

        assert_window_property(&timestamps, 3, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_cannot_overshoot() {
        use std::sync::Arc;

        let window = Arc::new(RequestWindow::new(4, Duration::from_secs(10)));
        let timestamps = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();

        for _ in 0..16 {
            let window = window.clone();
            let timestamps = timestamps.clone();

            handles.push(tokio::spawn(async move {
                window.acquire().await;
                timestamps.lock().await.push(Instant::now());
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let mut timestamps = timestamps.lock().await.clone();
        timestamps.sort();

        assert_eq!(timestamps.len(), 16);
        assert_window_property(&timestamps, 4, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_frees_up_as_entries_age_out() {
        let window = RequestWindow::new(2, Duration::from_secs(10));

        window.acquire().await;
        tokio::time::advance(Duration::from_secs(6)).await;
        window.acquire().await;

        assert_eq!(window.available().await, 0);

        // The first entry leaves the window after four more seconds.
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(window.available().await, 1);

        let start = Instant::now();
        window.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
