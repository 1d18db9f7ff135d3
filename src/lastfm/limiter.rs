//! Rate limiter capability.
//!
//! The client never implements throttling itself. It holds an optional
//! [`RateLimiter`] handle and awaits it before each outgoing request. Handles
//! are produced by a [`LimiterProvider`], which is injected into the service
//! wiring; when no provider is injected and the configuration asks for rate
//! limiting, construction fails instead of silently running unthrottled.
//!
//! With the `rate-limiter` feature (on by default), [`GovernorLimiters`]
//! provides named limiter factories backed by `governor`.

use std::sync::Arc;

use async_trait::async_trait;

/// Limiter key used for the Last.fm client's own limiter.
pub const DEFAULT_LIMITER_KEY: &str = "lastfm_api";

/// Throttle consulted by the transport before each request.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until one request may be sent.
    async fn acquire(&self);
}

/// Source of limiter handles, looked up by the configured service id.
pub trait LimiterProvider: Send + Sync {
    /// Create a limiter from the factory registered as `service_id`, scoped to `key`.
    ///
    /// Returns `None` when no factory is registered under `service_id`.
    fn create(&self, service_id: &str, key: &str) -> Option<Arc<dyn RateLimiter>>;
}

#[cfg(feature = "rate-limiter")]
pub use self::governed::{GovernorLimiter, GovernorLimiters};

#[cfg(feature = "rate-limiter")]
mod governed {
    use std::collections::HashMap;
    use std::num::NonZeroU32;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use governor::{DefaultDirectRateLimiter, Quota};

    use super::{LimiterProvider, RateLimiter};
    use crate::config::{ConfigError, LimiterConfig};

    /// GCRA limiter allowing `limit` requests per interval.
    pub struct GovernorLimiter {
        key: String,
        inner: DefaultDirectRateLimiter,
    }

    impl GovernorLimiter {
        pub fn new(key: impl Into<String>, quota: Quota) -> Self {
            Self {
                key: key.into(),
                inner: DefaultDirectRateLimiter::direct(quota),
            }
        }

        pub fn key(&self) -> &str {
            &self.key
        }
    }

    #[async_trait]
    impl RateLimiter for GovernorLimiter {
        async fn acquire(&self) {
            if self.inner.check().is_ok() {
                return;
            }
            tracing::debug!(key = %self.key, "Rate limit reached, waiting for capacity");
            self.inner.until_ready().await;
        }
    }

    /// Named limiter factories, keyed by service id.
    #[derive(Debug, Clone, Default)]
    pub struct GovernorLimiters {
        quotas: HashMap<String, Quota>,
    }

    impl GovernorLimiters {
        pub fn new() -> Self {
            Self::default()
        }

        /// Build factories from `[rate_limiters.<id>]` config tables.
        pub fn from_config<'a>(
            limiters: impl IntoIterator<Item = (&'a String, &'a LimiterConfig)>,
        ) -> Result<Self, ConfigError> {
            let mut registry = Self::new();
            for (id, config) in limiters {
                registry.register(id.clone(), quota(id, config)?);
            }
            Ok(registry)
        }

        pub fn register(&mut self, id: impl Into<String>, quota: Quota) {
            self.quotas.insert(id.into(), quota);
        }
    }

    impl LimiterProvider for GovernorLimiters {
        fn create(&self, service_id: &str, key: &str) -> Option<Arc<dyn RateLimiter>> {
            let quota = self.quotas.get(service_id)?;
            Some(Arc::new(GovernorLimiter::new(key, *quota)))
        }
    }

    /// `limit` requests per `interval_secs`, with the full limit available as burst.
    fn quota(id: &str, config: &LimiterConfig) -> Result<Quota, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidLimiter {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let burst =
            NonZeroU32::new(config.limit).ok_or_else(|| invalid("limit must be at least 1"))?;
        if config.interval_secs == 0 {
            return Err(invalid("interval_secs must be greater than 0"));
        }
        let period = Duration::from_secs(config.interval_secs) / config.limit;
        let quota = Quota::with_period(period).ok_or_else(|| invalid("replenish period is zero"))?;
        Ok(quota.allow_burst(burst))
    }

}
