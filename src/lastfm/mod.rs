//! Last.fm client construction.
//!
//! # Architecture
//!
//! - **Domain** (`domain.rs`) - normalized credentials, auth modes, transport options
//! - **Builder** (`builder.rs`) - the construction policy deciding the auth mode
//! - **Client** (`client.rs`) - the constructed client and its HTTP transport
//! - **Limiter** (`limiter.rs`) - rate limiter capability consulted per request
//!
//! # Usage
//!
//! ```ignore
//! use lastfm_provider::lastfm::{ClientBuilder, ClientOptions};
//!
//! let client = ClientBuilder::new()
//!     .credentials(Some("your-api-key"), None, None)
//!     .options(ClientOptions::default().with_user_agent("MyApp/1.0"))
//!     .build()?;
//!
//! let info = client.call("artist.getInfo", &[("artist", "Cher")]).await?;
//! ```

pub mod builder;
pub mod client;
pub mod domain;
pub mod limiter;

pub use builder::{ClientBuilder, build_client, resolve_auth};
pub use client::{DEFAULT_BASE_URL, LastFmClient};
pub use domain::{
    Auth, AuthMode, ClientOptions, Credentials, MAX_USER_AGENT_LEN, MIN_CREDENTIAL_LEN,
};
pub use limiter::{DEFAULT_LIMITER_KEY, LimiterProvider, RateLimiter};
#[cfg(feature = "rate-limiter")]
pub use limiter::{GovernorLimiter, GovernorLimiters};
