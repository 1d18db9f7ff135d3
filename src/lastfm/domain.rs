//! Credential and option types consumed by the client builder.
//!
//! Values are normalized once at construction and immutable afterwards.
//! Secrets are stored as [`SecretString`] so they never appear in `Debug`
//! output or logs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use super::limiter::RateLimiter;

/// Minimum length accepted for an API key or API secret.
pub const MIN_CREDENTIAL_LEN: usize = 10;

/// Maximum accepted User-Agent length.
pub const MAX_USER_AGENT_LEN: usize = 200;

/// Header name the configured user agent is placed under.
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// Trim a credential, treating empty results as absent.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Normalized Last.fm credentials.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    api_key: Option<SecretString>,
    api_secret: Option<SecretString>,
    session_key: Option<SecretString>,
}

impl Credentials {
    /// Normalize raw values: whitespace is trimmed and blank values become absent.
    pub fn new(api_key: Option<&str>, api_secret: Option<&str>, session_key: Option<&str>) -> Self {
        Self {
            api_key: normalize(api_key).map(SecretString::from),
            api_secret: normalize(api_secret).map(SecretString::from),
            session_key: normalize(session_key).map(SecretString::from),
        }
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    pub fn api_secret(&self) -> Option<&SecretString> {
        self.api_secret.as_ref()
    }

    pub fn session_key(&self) -> Option<&SecretString> {
        self.session_key.as_ref()
    }
}

/// Authentication the client was constructed with.
#[derive(Debug, Clone)]
pub enum Auth {
    /// No credentials; public endpoints only
    Anonymous,
    /// API key only; read-only methods
    ApiKey { api_key: SecretString },
    /// API key and secret; write-capable, optionally bound to a user session
    Signed {
        api_key: SecretString,
        api_secret: SecretString,
        session_key: Option<SecretString>,
    },
}

impl Auth {
    pub fn mode(&self) -> AuthMode {
        match self {
            Auth::Anonymous => AuthMode::Anonymous,
            Auth::ApiKey { .. } => AuthMode::ReadOnly,
            Auth::Signed { .. } => AuthMode::Authenticated,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        match self {
            Auth::Anonymous => None,
            Auth::ApiKey { api_key } | Auth::Signed { api_key, .. } => {
                Some(api_key.expose_secret())
            }
        }
    }

    pub fn has_session(&self) -> bool {
        matches!(
            self,
            Auth::Signed {
                session_key: Some(_),
                ..
            }
        )
    }
}

/// Summary of [`Auth`] without secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Anonymous,
    ReadOnly,
    Authenticated,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Anonymous => write!(f, "anonymous"),
            AuthMode::ReadOnly => write!(f, "read-only"),
            AuthMode::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Transport settings handed to the client unmodified.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Extra request headers (name -> value)
    pub headers: BTreeMap<String, String>,
    /// Whole-request timeout
    pub timeout: Option<Duration>,
    /// Endpoint override (defaults to the public Last.fm endpoint)
    pub base_url: Option<String>,
    /// Limiter consulted before each request
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl ClientOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        self.with_header(USER_AGENT_HEADER, user_agent)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Configured User-Agent, matched case-insensitively.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(USER_AGENT_HEADER))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("rate_limiter", &self.rate_limiter.is_some())
            .finish()
    }
}
