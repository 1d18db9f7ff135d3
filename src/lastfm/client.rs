//! Last.fm HTTP client
//!
//! Holds the authentication chosen by the builder plus a configured
//! `reqwest` transport. Construction performs no I/O.
//!
//! Request signing and typed responses belong to the protocol layer; this
//! client only offers unsigned read calls, which is enough for the public
//! and API-key methods (`artist.getInfo`, `track.search`, ...).

use serde_json::Value;

use super::domain::{Auth, AuthMode, ClientOptions};
use crate::error::{Result, ValidationError};

/// Public Last.fm API endpoint
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// User agent sent when none is configured
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Last.fm API client
pub struct LastFmClient {
    auth: Auth,
    options: ClientOptions,
    http_client: reqwest::Client,
    base_url: String,
}

impl LastFmClient {
    /// Create a client with the given authentication and transport options.
    ///
    /// Configured headers are sent with every request. The transport is
    /// configured to:
    /// - Accept gzip-compressed responses
    /// - Send a default User-Agent unless one is configured
    pub(crate) fn new(auth: Auth, options: ClientOptions) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ValidationError::invalid_header(name, e))?;
            let header_value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| ValidationError::invalid_header(name, e))?;
            headers.insert(header_name, header_value);
        }
        if !headers.contains_key(reqwest::header::USER_AGENT) {
            headers.insert(
                reqwest::header::USER_AGENT,
                reqwest::header::HeaderValue::from_static(DEFAULT_USER_AGENT),
            );
        }

        let mut builder = reqwest::Client::builder().gzip(true).default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = options
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            auth,
            options,
            http_client,
            base_url,
        })
    }

    pub fn mode(&self) -> AuthMode {
        self.auth.mode()
    }

    /// True when a user session key is attached (authenticated mode only).
    pub fn has_session(&self) -> bool {
        self.auth.has_session()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_rate_limited(&self) -> bool {
        self.options.rate_limiter.is_some()
    }

    /// Call an unsigned API method and return the JSON body.
    ///
    /// The configured rate limiter, if any, is awaited before the request is
    /// sent. Transport and HTTP status errors are returned as-is.
    pub async fn call(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<Value, reqwest::Error> {
        if let Some(limiter) = &self.options.rate_limiter {
            limiter.acquire().await;
        }

        let url = self.method_url(method, params);
        tracing::debug!(method, "Sending Last.fm request");

        self.http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }

    fn method_url(&self, method: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&format=json",
            self.base_url,
            urlencoding::encode(method)
        );
        if let Some(api_key) = self.auth.api_key() {
            url.push_str("&api_key=");
            url.push_str(&urlencoding::encode(api_key));
        }
        for (name, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

impl std::fmt::Debug for LastFmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastFmClient")
            .field("mode", &self.mode())
            .field("has_session", &self.has_session())
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}
