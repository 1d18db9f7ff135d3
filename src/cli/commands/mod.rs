//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `check`: build the client and report how it was configured
//! - `call`: build the client and call one read-only API method

mod call;
mod check;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::lastfm::domain::normalize;
use crate::services::Services;

pub use call::cmd_call;
pub use check::cmd_check;

/// lastfm-provider CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credential overrides; take precedence over the config file
#[derive(Args, Default)]
pub struct CredentialArgs {
    /// Last.fm API key
    #[arg(long, env = "LASTFM_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Last.fm API secret
    #[arg(long, env = "LASTFM_API_SECRET", global = true, hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Last.fm user session key
    #[arg(long, env = "LASTFM_SESSION_KEY", global = true, hide_env_values = true)]
    pub session_key: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the client from configuration and report its mode
    Check,
    /// Call a read-only API method and print the JSON response
    Call {
        /// API method, e.g. artist.getInfo
        method: String,
        /// Method parameter as name=value (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// Print the default config file location
    ConfigPath,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Check => {
            let services = load_services(cli.config.as_deref(), &cli.credentials)?;
            cmd_check(&services);
            Ok(())
        }
        Commands::Call { method, params } => {
            let services = load_services(cli.config.as_deref(), &cli.credentials)?;
            cmd_call(&services, method, params)
        }
        Commands::ConfigPath => {
            match config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => anyhow::bail!("Could not determine config directory"),
            }
            Ok(())
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the config file, apply overrides, then resolve and wire the client.
pub(crate) fn load_services(
    path: Option<&Path>,
    overrides: &CredentialArgs,
) -> anyhow::Result<Services> {
    let config = match path {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    let config = apply_overrides(config, overrides);

    Services::from_config(config).context("Failed to configure Last.fm client")
}

/// Non-blank overrides replace the file values; blank ones are ignored.
fn apply_overrides(mut config: Config, overrides: &CredentialArgs) -> Config {
    let lastfm = &mut config.lastfm;
    for (target, value) in [
        (&mut lastfm.api_key, &overrides.api_key),
        (&mut lastfm.api_secret, &overrides.api_secret),
        (&mut lastfm.session_key, &overrides.session_key),
    ] {
        if let Some(value) = normalize(value.as_deref()) {
            *target = Some(value);
        }
    }
    config
}

/// Split `name=value` method parameters.
pub(crate) fn parse_params(params: &[String]) -> anyhow::Result<Vec<(&str, &str)>> {
    params
        .iter()
        .map(|param| {
            param
                .split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .with_context(|| format!("Invalid parameter {:?}, expected NAME=VALUE", param))
        })
        .collect()
}
