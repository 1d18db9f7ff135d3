//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lastfm-provider\config.toml
//! - macOS: ~/Library/Application Support/lastfm-provider/config.toml
//! - Linux: ~/.config/lastfm-provider/config.toml
//!
//! ```toml
//! [lastfm]
//! api_key = "%env(LASTFM_API_KEY)%"
//! api_secret = "%env(LASTFM_API_SECRET)%"
//! user_agent = "MyMusicApp/2.0"
//! rate_limiter = "lastfm"
//!
//! [lastfm.http]
//! timeout_secs = 30
//!
//! [rate_limiters.lastfm]
//! limit = 5
//! interval_secs = 1
//! ```
//!
//! String values may reference environment variables as `%env(NAME)%`.
//! Placeholders are opaque until [`Config::resolve_env`] substitutes them,
//! which happens before validation and before any credential reaches the
//! client builder.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::lastfm::MAX_USER_AGENT_LEN;

const ENV_PREFIX: &str = "%env(";
const ENV_SUFFIX: &str = ")%";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Last.fm client settings
    pub lastfm: LastfmConfig,

    /// Named limiter factories, referenced by `lastfm.rate_limiter`
    pub rate_limiters: BTreeMap<String, LimiterConfig>,
}

/// Last.fm client settings
///
/// `secret`, `session` and `http_client_options` are accepted as legacy
/// spellings of `api_secret`, `session_key` and `http`.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LastfmConfig {
    /// API key (get one at https://www.last.fm/api/account/create)
    pub api_key: Option<String>,

    /// API secret, required for authenticated operations
    #[serde(alias = "secret")]
    pub api_secret: Option<String>,

    /// User session key, only used together with key and secret
    #[serde(alias = "session")]
    pub session_key: Option<String>,

    /// HTTP User-Agent header (at most 200 characters)
    pub user_agent: Option<String>,

    /// Id of a `[rate_limiters.<id>]` table to throttle requests with
    pub rate_limiter: Option<String>,

    /// Transport settings
    #[serde(alias = "http_client_options")]
    pub http: HttpConfig,
}

/// Transport settings passed through to the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Endpoint override
    pub base_url: Option<String>,

    /// Extra request headers
    pub headers: BTreeMap<String, String>,
}

/// Limiter factory: `limit` requests per `interval_secs`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimiterConfig {
    pub limit: u32,
    pub interval_secs: u64,
}

impl fmt::Debug for LastfmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("LastfmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("session_key", &redact(&self.session_key))
            .field("user_agent", &self.user_agent)
            .field("rate_limiter", &self.rate_limiter)
            .field("http", &self.http)
            .finish()
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Substitute `%env(NAME)%` placeholders from the process environment.
    pub fn resolve_env(self) -> Result<Self, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Substitute `%env(NAME)%` placeholders using `lookup`.
    pub fn resolve_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lastfm = &mut self.lastfm;
        for value in [
            &mut lastfm.api_key,
            &mut lastfm.api_secret,
            &mut lastfm.session_key,
            &mut lastfm.user_agent,
            &mut lastfm.rate_limiter,
            &mut lastfm.http.base_url,
        ]
        .into_iter()
        .flatten()
        {
            *value = expand_placeholders(value.as_str(), &lookup)?;
        }
        for value in lastfm.http.headers.values_mut() {
            *value = expand_placeholders(value.as_str(), &lookup)?;
        }
        Ok(self)
    }
}

impl LastfmConfig {
    /// Schema checks that do not depend on the credential policy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(user_agent) = &self.user_agent
            && user_agent.len() > MAX_USER_AGENT_LEN
        {
            return Err(ValidationError::UserAgentTooLong {
                max: MAX_USER_AGENT_LEN,
                actual: user_agent.len(),
            });
        }

        if let Some(rate_limiter) = &self.rate_limiter
            && rate_limiter.trim().is_empty()
        {
            return Err(ValidationError::EmptyRateLimiter);
        }

        Ok(())
    }
}

/// Replace every `%env(NAME)%` in `value`. Unterminated placeholders are kept verbatim.
pub fn expand_placeholders(
    value: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(ENV_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + ENV_PREFIX.len()..];
        let Some(end) = after.find(ENV_SUFFIX) else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = &after[..end];
        let resolved = lookup(name).ok_or_else(|| ConfigError::MissingEnv(name.to_string()))?;
        out.push_str(&resolved);
        rest = &after[end + ENV_SUFFIX.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lastfm-provider"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// A missing file yields the default (anonymous) configuration. A file
/// that exists but cannot be read or parsed is an error.
pub fn load() -> Result<Config, ConfigError> {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    load_from(&path)
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = Config::from_toml_str(&contents)?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(toml::de::Error),

    #[error("Environment variable {0} referenced as %env({0})% is not set")]
    MissingEnv(String),

    #[error("Invalid rate limiter \"{id}\": {reason}")]
    InvalidLimiter { id: String, reason: String },
}

// ============================================================================
// Tests
// ============================================================================
