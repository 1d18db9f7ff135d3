//! Library-wide error types.
//!
//! Library modules return these `thiserror` types; the CLI wraps them in
//! `anyhow` for propagation with context.
//!
//! # Design
//!
//! - [`Error`]: top-level error for client construction and wiring
//! - [`ValidationError`]: malformed or incomplete settings, with operator
//!   remediation text embedded in the message
//! - Request-time transport errors are not represented here; they surface
//!   unchanged as `reqwest::Error` from [`crate::lastfm::LastFmClient::call`]
//!
//! # Example
//!
//! ```ignore
//! use lastfm_provider::error::{Error, ValidationError};
//!
//! match lastfm_provider::build_client(None, Some("only-a-secret"), None, Default::default()) {
//!     Err(Error::Validation(ValidationError::IncompleteCredentials)) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::fmt;

use crate::config::ConfigError;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Where to obtain credentials and how to wire them into the config file.
pub const SETUP_INSTRUCTIONS: &str = "To configure Last.fm API credentials:
1. API key and secret (full functionality, including scrobbling):
   - Get your credentials from: https://www.last.fm/api/account/create
   - Set environment variables:
     LASTFM_API_KEY=your_key_here
     LASTFM_API_SECRET=your_secret_here
   - Reference them from the [lastfm] section of config.toml:
     api_key = \"%env(LASTFM_API_KEY)%\"
     api_secret = \"%env(LASTFM_API_SECRET)%\"

2. API key only (read-only operations):
   - Set environment variable:
     LASTFM_API_KEY=your_key_here
   - Reference it from the [lastfm] section of config.toml:
     api_key = \"%env(LASTFM_API_KEY)%\"

3. Anonymous access (public endpoints only):
   - No configuration needed
";

/// Remediation shown when a rate limiter is configured but the capability is missing.
pub const RATE_LIMITER_REMEDIATION: &str =
    "Rebuild with the limiter capability enabled: cargo build --features rate-limiter";

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or incomplete settings
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A configured feature needs a capability the runtime does not provide
    #[error("{capability} is not available in this build. {remediation}")]
    CapabilityUnavailable {
        capability: &'static str,
        remediation: &'static str,
    },

    /// The configured limiter id does not name a registered limiter factory
    #[error("Rate limiter \"{0}\" is not defined. Add a [rate_limiters.{0}] table to the configuration")]
    UnknownRateLimiter(String),

    /// Configuration could not be loaded or resolved
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP transport could not be constructed
    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Create the error for a configured rate limiter without limiter support.
    pub fn rate_limiter_unavailable() -> Self {
        Self::CapabilityUnavailable {
            capability: "Rate limiting",
            remediation: RATE_LIMITER_REMEDIATION,
        }
    }

    /// Create an unknown rate limiter error.
    pub fn unknown_rate_limiter(id: impl Into<String>) -> Self {
        Self::UnknownRateLimiter(id.into())
    }
}

/// Credential field named in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    ApiKey,
    ApiSecret,
}

impl CredentialField {
    /// Environment variable conventionally holding this credential.
    pub fn env_var(self) -> &'static str {
        match self {
            CredentialField::ApiKey => "LASTFM_API_KEY",
            CredentialField::ApiSecret => "LASTFM_API_SECRET",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::ApiKey => write!(f, "API key"),
            CredentialField::ApiSecret => write!(f, "API secret"),
        }
    }
}

/// Malformed or incomplete settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", describe_short_credential(.field, .min, .actual))]
    CredentialTooShort {
        field: CredentialField,
        min: usize,
        actual: usize,
    },

    #[error(
        "Incomplete API credentials provided. API key is required when API secret is provided.\n\n{instructions}",
        instructions = SETUP_INSTRUCTIONS
    )]
    IncompleteCredentials,

    #[error("User-Agent cannot be longer than {max} characters, got {actual}")]
    UserAgentTooLong { max: usize, actual: usize },

    #[error("Rate limiter service ID cannot be empty")]
    EmptyRateLimiter,

    #[error("Invalid HTTP header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

fn describe_short_credential(field: &CredentialField, min: &usize, actual: &usize) -> String {
    format!(
        "{field} must be at least {min} characters long, got {actual} characters. Check {}.\n\n{SETUP_INSTRUCTIONS}",
        field.env_var()
    )
}

impl ValidationError {
    /// Create an invalid header error.
    pub fn invalid_header(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_credential_message_is_actionable() {
        let err = ValidationError::CredentialTooShort {
            field: CredentialField::ApiKey,
            min: 10,
            actual: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("API key must be at least 10 characters long, got 5 characters"));
        assert!(msg.contains("LASTFM_API_KEY"));
        assert!(msg.contains("To configure Last.fm API credentials:"));
        assert!(msg.contains("https://www.last.fm/api/account/create"));
        assert!(msg.contains("%env(LASTFM_API_KEY)%"));
    }

    #[test]
    fn test_short_secret_names_secret_variable() {
        let err = ValidationError::CredentialTooShort {
            field: CredentialField::ApiSecret,
            min: 10,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("API secret must be at least 10"));
        assert!(msg.contains("Check LASTFM_API_SECRET"));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: Error = ValidationError::EmptyRateLimiter.into();
        assert_eq!(err.to_string(), "Rate limiter service ID cannot be empty");
    }

    #[test]
    fn test_capability_error_has_remediation() {
        let msg = Error::rate_limiter_unavailable().to_string();
        assert!(msg.contains("Rate limiting is not available"));
        assert!(msg.contains("--features rate-limiter"));
    }

    #[test]
    fn test_unknown_limiter_names_table() {
        let msg = Error::unknown_rate_limiter("lastfm").to_string();
        assert!(msg.contains("[rate_limiters.lastfm]"));
    }
}
