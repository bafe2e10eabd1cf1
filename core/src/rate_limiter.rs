//! Shared rate limiting for item processing
//!
//! A single [`RateLimiter`] is created per run and shared by every worker via
//! `Arc`, so the ceiling applies to the pool as a whole rather than per worker.

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota};
use std::num::NonZeroU32;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, RateLimitConfig};
use crate::error::DispatchResult;
use crate::traits::PermitGate;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket limiter backed by the governor crate
///
/// Governor's GCRA state is equivalent to a token bucket holding `burst`
/// permits and refilled at `per_minute / 60` permits per second. A full bucket
/// grants `burst` permits immediately, after which grants are paced at the
/// refill rate.
pub struct RateLimiter {
    limiter: Option<DirectLimiter>,
    config: Option<RateLimitConfig>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `config` - Optional ceiling and burst. `None` disables rate limiting.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidRateLimit`] if the ceiling or burst is
    /// zero. A zero field never turns the limiter off.
    ///
    /// # Examples
    /// ```
    /// use rated_dispatch_core::{RateLimitConfig, RateLimiter};
    ///
    /// // 95 permits per minute, bursts of 5
    /// let limiter = RateLimiter::new(Some(RateLimitConfig::new(95, 5))).unwrap();
    /// assert!(limiter.is_enabled());
    ///
    /// assert!(RateLimiter::new(Some(RateLimitConfig::new(0, 5))).is_err());
    /// assert!(!RateLimiter::unlimited().is_enabled());
    /// ```
    pub fn new(config: Option<RateLimitConfig>) -> DispatchResult<Self> {
        let Some(limit) = config else {
            return Ok(Self::unlimited());
        };

        let per_minute = NonZeroU32::new(limit.per_minute).ok_or_else(|| {
            ConfigError::InvalidRateLimit("ceiling must be at least 1 per minute".into())
        })?;
        let burst = NonZeroU32::new(limit.burst)
            .ok_or_else(|| ConfigError::InvalidRateLimit("burst must be at least 1".into()))?;
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Ok(Self {
            limiter: Some(DirectLimiter::direct(quota)),
            config: Some(limit),
        })
    }

    /// Create an unlimited rate limiter (no rate limiting)
    pub fn unlimited() -> Self {
        Self {
            limiter: None,
            config: None,
        }
    }

    /// Wait until one permit is available and take it
    ///
    /// Returns immediately if no rate limit is configured. There is no
    /// deadline: the call waits as long as the refill schedule dictates.
    pub async fn acquire(&self) {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Wait for a permit unless `cancel` fires first
    ///
    /// An already-cancelled token fails immediately even when a permit is
    /// available.
    ///
    /// # Errors
    /// Returns [`DispatchError::Cancelled`] if the token is cancelled before a
    /// permit is granted.
    pub async fn acquire_with_cancel(&self, cancel: &CancellationToken) -> DispatchResult<()> {
        <Self as PermitGate>::acquire_with_cancel(self, cancel).await
    }

    /// Try to take a permit without waiting
    ///
    /// Returns `true` if a permit was taken, `false` if the bucket is empty.
    /// Always returns `true` if no rate limit is configured.
    pub fn try_acquire(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Get the configured ceiling and burst
    pub fn config(&self) -> Option<RateLimitConfig> {
        self.config
    }
}

#[async_trait]
impl PermitGate for RateLimiter {
    async fn acquire(&self) {
        RateLimiter::acquire(self).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_rate_limiter_disabled() {
        let limiter = RateLimiter::new(None).unwrap();
        assert!(!limiter.is_enabled());
        assert!(limiter.config().is_none());
        assert!(limiter.try_acquire());
    }

    #[test]
    fn test_rate_limiter_zero_ceiling() {
        let result = RateLimiter::new(Some(RateLimitConfig::new(0, 5)));
        assert!(matches!(
            result,
            Err(DispatchError::Config(ConfigError::InvalidRateLimit(_)))
        ));
    }

    #[test]
    fn test_rate_limiter_zero_burst() {
        let result = RateLimiter::new(Some(RateLimitConfig::new(95, 0)));
        assert!(matches!(
            result,
            Err(DispatchError::Config(ConfigError::InvalidRateLimit(_)))
        ));
    }

    #[test]
    fn test_rate_limiter_enabled() {
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(95, 5))).unwrap();
        assert!(limiter.is_enabled());
        assert_eq!(limiter.config(), Some(RateLimitConfig::new(95, 5)));
    }

    #[test]
    fn test_rate_limiter_default_is_unlimited() {
        assert!(!RateLimiter::default().is_enabled());
        assert!(!RateLimiter::unlimited().is_enabled());
    }

    #[test]
    fn test_burst_granted_then_exhausted() {
        // One permit per minute refill: nothing comes back during the test.
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(1, 5))).unwrap();
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_disabled_returns_immediately() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..1000 {
            limiter.acquire().await;
        }
    }

    #[tokio::test]
    async fn test_acquire_paces_after_burst() {
        // 10 permits per second, burst of 1: 11 permits need ~1s.
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(600, 1))).unwrap();
        let start = Instant::now();
        for _ in 0..11 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_acquire_shared_across_tasks() {
        // Burst of 2, then 20/s: 12 permits across 4 tasks need ~0.5s.
        let limiter = Arc::new(RateLimiter::new(Some(RateLimitConfig::new(1200, 2))).unwrap());
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    for _ in 0..3 {
                        limiter.acquire().await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("acquire task panicked");
        }

        assert!(start.elapsed() >= Duration::from_millis(450));
    }

    #[tokio::test]
    async fn test_acquire_with_cancel_already_cancelled() {
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(95, 5))).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = limiter.acquire_with_cancel(&cancel).await;
        assert!(matches!(result, Err(DispatchError::Cancelled)));
        // The failed call must not have spent a permit.
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
    }

    #[tokio::test]
    async fn test_acquire_with_cancel_while_waiting() {
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(1, 1))).unwrap();
        assert!(limiter.try_acquire());

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let result = limiter.acquire_with_cancel(&cancel).await;
        assert!(matches!(result, Err(DispatchError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_acquire_with_cancel_granted() {
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(95, 5))).unwrap();
        let cancel = CancellationToken::new();
        assert!(limiter.acquire_with_cancel(&cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_permit_gate_trait_object() {
        let gate: Arc<dyn PermitGate> = Arc::new(RateLimiter::unlimited());
        gate.acquire().await;
        assert!(gate.acquire_with_cancel(&CancellationToken::new()).await.is_ok());
    }

    #[test]
    fn test_rate_limiter_debug() {
        let limiter = RateLimiter::new(Some(RateLimitConfig::new(95, 5))).unwrap();
        let debug = format!("{:?}", limiter);
        assert!(debug.contains("RateLimiter"));
        assert!(debug.contains("95"));
        assert!(debug.contains("true"));
    }
}
