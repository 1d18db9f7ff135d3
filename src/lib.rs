//! lastfm-provider - validated construction of a Last.fm API client.
//!
//! Application configuration goes in, a ready [`LastFmClient`] comes out.
//! Credentials are normalized and checked up front so a misconfigured
//! deployment fails at startup with a message that says how to fix it,
//! instead of on the first API call.
//!
//! ```no_run
//! use lastfm_provider::{ClientOptions, build_client};
//!
//! let client = build_client(
//!     Some("your-api-key-here"),
//!     Some("your-api-secret-here"),
//!     None,
//!     ClientOptions::default().with_user_agent("MyApp/1.0"),
//! )?;
//! println!("{}", client.mode());
//! # Ok::<(), lastfm_provider::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod services;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result, ValidationError};
pub use lastfm::{AuthMode, ClientBuilder, ClientOptions, LastFmClient, build_client};
pub use services::Services;
