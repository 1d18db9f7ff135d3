//! Credential-driven client construction.
//!
//! Chooses exactly one construction path from the credentials present,
//! evaluated top to bottom:
//!
//! 1. key + secret: authenticated client, session attached when present
//! 2. key only: read-only client, any session key is ignored
//! 3. secret only: rejected, a secret presupposes a key
//! 4. nothing: anonymous client restricted to public endpoints
//!
//! Key and secret must each be at least [`MIN_CREDENTIAL_LEN`] characters.
//! Blank values count as absent. Transport options pass through untouched.

use secrecy::ExposeSecret;

use super::client::LastFmClient;
use super::domain::{Auth, ClientOptions, Credentials, MIN_CREDENTIAL_LEN};
use crate::error::{CredentialField, Result, ValidationError};

/// Builder for [`LastFmClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    credentials: Credentials,
    options: ClientOptions,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw credentials; they are normalized immediately.
    pub fn credentials(
        mut self,
        api_key: Option<&str>,
        api_secret: Option<&str>,
        session_key: Option<&str>,
    ) -> Self {
        self.credentials = Credentials::new(api_key, api_secret, session_key);
        self
    }

    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the credentials and construct the client.
    pub fn build(self) -> Result<LastFmClient> {
        let auth = resolve_auth(&self.credentials)?;
        tracing::info!(
            mode = %auth.mode(),
            session = auth.has_session(),
            rate_limited = self.options.rate_limiter.is_some(),
            "Constructing Last.fm client"
        );
        LastFmClient::new(auth, self.options)
    }
}

/// Build a client from raw credential values.
pub fn build_client(
    api_key: Option<&str>,
    api_secret: Option<&str>,
    session_key: Option<&str>,
    options: ClientOptions,
) -> Result<LastFmClient> {
    ClientBuilder::new()
        .credentials(api_key, api_secret, session_key)
        .options(options)
        .build()
}

/// Decide the authentication mode for normalized credentials.
pub fn resolve_auth(credentials: &Credentials) -> std::result::Result<Auth, ValidationError> {
    match (credentials.api_key(), credentials.api_secret()) {
        (Some(api_key), Some(api_secret)) => {
            check_length(CredentialField::ApiKey, api_key.expose_secret())?;
            check_length(CredentialField::ApiSecret, api_secret.expose_secret())?;
            Ok(Auth::Signed {
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
                session_key: credentials.session_key().cloned(),
            })
        }
        (Some(api_key), None) => {
            check_length(CredentialField::ApiKey, api_key.expose_secret())?;
            if credentials.session_key().is_some() {
                tracing::debug!("Session key ignored: an API secret is required for user sessions");
            }
            Ok(Auth::ApiKey {
                api_key: api_key.clone(),
            })
        }
        (None, Some(_)) => Err(ValidationError::IncompleteCredentials),
        (None, None) => Ok(Auth::Anonymous),
    }
}

fn check_length(field: CredentialField, value: &str) -> std::result::Result<(), ValidationError> {
    if value.len() < MIN_CREDENTIAL_LEN {
        return Err(ValidationError::CredentialTooShort {
            field,
            min: MIN_CREDENTIAL_LEN,
            actual: value.len(),
        });
    }
    Ok(())
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn credential() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]{10,40}"
    }

    fn short_credential() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]{1,9}"
    }

    fn blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    fn resolve(
        key: Option<&str>,
        secret: Option<&str>,
        session: Option<&str>,
    ) -> std::result::Result<Auth, ValidationError> {
        resolve_auth(&Credentials::new(key, secret, session))
    }

    proptest! {
        /// Long enough key and secret always yield an authenticated client
        #[test]
        fn key_and_secret_authenticate(
            key in credential(),
            secret in credential(),
            session in proptest::option::of(credential()),
        ) {
            let auth = resolve(Some(&key), Some(&secret), session.as_deref()).unwrap();
            let is_signed = matches!(auth, Auth::Signed { .. });
            prop_assert!(is_signed);
            prop_assert_eq!(auth.has_session(), session.is_some());
        }

        /// Key without secret is read-only whatever session key is supplied
        #[test]
        fn key_only_is_read_only(
            key in credential(),
            session in proptest::option::of(credential()),
        ) {
            let auth = resolve(Some(&key), None, session.as_deref()).unwrap();
            let is_read_only = matches!(auth, Auth::ApiKey { .. });
            prop_assert!(is_read_only);
            prop_assert!(!auth.has_session());
        }

        /// A secret without a key is always incomplete
        #[test]
        fn secret_without_key_fails(secret in "[A-Za-z0-9]{1,40}", key in blank()) {
            let err = resolve(Some(&key), Some(&secret), None).unwrap_err();
            prop_assert_eq!(err, ValidationError::IncompleteCredentials);
        }

        /// Short keys are rejected in both key paths
        #[test]
        fn short_key_fails(
            key in short_credential(),
            secret in proptest::option::of(credential()),
        ) {
            let err = resolve(Some(&key), secret.as_deref(), None).unwrap_err();
            let is_key_error = matches!(
                err,
                ValidationError::CredentialTooShort { field: CredentialField::ApiKey, .. }
            );
            prop_assert!(is_key_error);
        }

        /// Blank strings behave exactly like missing values
        #[test]
        fn blank_equivalent_to_absent(
            key in proptest::option::of(credential()),
            secret in proptest::option::of(credential()),
            padding in blank(),
        ) {
            let with_blank_session =
                resolve(key.as_deref(), secret.as_deref(), Some(&padding)).map(|a| a.mode());
            let without_session =
                resolve(key.as_deref(), secret.as_deref(), None).map(|a| a.mode());
            prop_assert_eq!(with_blank_session, without_session);

            let blank_key = resolve(Some(&padding), secret.as_deref(), None).map(|a| a.mode());
            let no_key = resolve(None, secret.as_deref(), None).map(|a| a.mode());
            prop_assert_eq!(blank_key, no_key);
        }

        /// Surrounding whitespace never changes the outcome
        #[test]
        fn padding_is_ignored(key in credential(), secret in credential(), pad in blank()) {
            let padded_key = format!("{pad}{key}{pad}");
            let padded_secret = format!("{pad}{secret}{pad}");
            let padded = resolve(Some(&padded_key), Some(&padded_secret), None).map(|a| a.mode());
            let plain = resolve(Some(&key), Some(&secret), None).map(|a| a.mode());
            prop_assert_eq!(padded, plain);
        }
    }
}
