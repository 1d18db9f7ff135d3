//! Service wiring: resolved configuration in, one shared client out.
//!
//! [`Services::load`] validates the `[lastfm]` settings, translates them into
//! [`ClientOptions`], builds the client once and registers it under
//! [`CLIENT_SERVICE_ID`]. The limiter capability is passed in explicitly;
//! configuring `rate_limiter` without one fails immediately.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, LastfmConfig};
use crate::error::{Error, Result};
use crate::lastfm::{
    ClientBuilder, ClientOptions, DEFAULT_LIMITER_KEY, LastFmClient, LimiterProvider,
};

/// Identifier the client is registered under.
pub const CLIENT_SERVICE_ID: &str = "lastfm.client";

/// Type-name alias resolving to the same client.
pub const CLIENT_SERVICE_ALIAS: &str = "LastFmClient";

/// Registry holding the constructed client.
#[derive(Debug, Clone)]
pub struct Services {
    client: Arc<LastFmClient>,
}

impl Services {
    /// Resolve `%env()%` placeholders and build the client with the limiter
    /// capability compiled into this build.
    pub fn from_config(config: Config) -> Result<Self> {
        let config = config.resolve_env()?;
        let limiters = limiter_capability(&config)?;
        Self::load(&config.lastfm, limiters.as_deref())
    }

    /// Validate settings and build the client.
    ///
    /// `limiters` is the rate limiter capability; pass `None` when the
    /// runtime has no limiter support.
    pub fn load(config: &LastfmConfig, limiters: Option<&dyn LimiterProvider>) -> Result<Self> {
        let options = client_options(config, limiters)?;
        let client = ClientBuilder::new()
            .credentials(
                config.api_key.as_deref(),
                config.api_secret.as_deref(),
                config.session_key.as_deref(),
            )
            .options(options)
            .build()?;

        tracing::debug!(service = CLIENT_SERVICE_ID, "Registered Last.fm client");
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Look up a service by identifier.
    pub fn get(&self, id: &str) -> Option<Arc<LastFmClient>> {
        match id {
            CLIENT_SERVICE_ID | CLIENT_SERVICE_ALIAS => Some(Arc::clone(&self.client)),
            _ => None,
        }
    }

    pub fn client(&self) -> &Arc<LastFmClient> {
        &self.client
    }
}

#[cfg(feature = "rate-limiter")]
fn limiter_capability(config: &Config) -> Result<Option<Box<dyn LimiterProvider>>> {
    let limiters = crate::lastfm::GovernorLimiters::from_config(&config.rate_limiters)?;
    Ok(Some(Box::new(limiters)))
}

#[cfg(not(feature = "rate-limiter"))]
fn limiter_capability(_config: &Config) -> Result<Option<Box<dyn LimiterProvider>>> {
    Ok(None)
}

/// Translate `[lastfm]` settings into transport options.
///
/// The user agent, when set, takes precedence over a `User-Agent` entry in
/// `http.headers`.
pub fn client_options(
    config: &LastfmConfig,
    limiters: Option<&dyn LimiterProvider>,
) -> Result<ClientOptions> {
    config.validate()?;

    let mut options = ClientOptions {
        headers: config.http.headers.clone(),
        timeout: config.http.timeout_secs.map(Duration::from_secs),
        base_url: config.http.base_url.clone(),
        rate_limiter: None,
    };

    if let Some(user_agent) = config.user_agent.as_deref().filter(|ua| !ua.is_empty()) {
        options
            .headers
            .retain(|name, _| !name.eq_ignore_ascii_case(crate::lastfm::domain::USER_AGENT_HEADER));
        options = options.with_user_agent(user_agent);
    }

    if let Some(service_id) = config.rate_limiter.as_deref().map(str::trim) {
        let limiters = limiters.ok_or_else(Error::rate_limiter_unavailable)?;
        let limiter = limiters
            .create(service_id, DEFAULT_LIMITER_KEY)
            .ok_or_else(|| Error::unknown_rate_limiter(service_id))?;
        tracing::debug!(limiter = service_id, "Rate limiting Last.fm requests");
        options = options.with_rate_limiter(limiter);
    }

    Ok(options)
}
