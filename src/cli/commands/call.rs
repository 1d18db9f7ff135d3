//! One-off API method calls.

use anyhow::Context;
use tokio::runtime::Runtime;

use super::parse_params;
use crate::services::Services;

/// Call `method` with `name=value` parameters and print the JSON response.
pub fn cmd_call(services: &Services, method: &str, params: &[String]) -> anyhow::Result<()> {
    let params = parse_params(params)?;
    let client = services.client();

    let rt = Runtime::new().context("Failed to start async runtime")?;
    let response = rt
        .block_on(client.call(method, &params))
        .with_context(|| format!("Last.fm call {} failed", method))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LastfmConfig;
    use crate::test_utils::{VALID_KEY, closed_port_url};

    #[test]
    fn test_call_reports_transport_failure() {
        let mut config = LastfmConfig {
            api_key: Some(VALID_KEY.to_string()),
            ..Default::default()
        };
        config.http.base_url = Some(closed_port_url());
        config.http.timeout_secs = Some(2);
        let services = Services::load(&config, None).unwrap();

        let err = cmd_call(&services, "artist.getInfo", &["artist=Cher".to_string()]).unwrap_err();

        assert!(format!("{:#}", err).contains("Last.fm call artist.getInfo failed"));
    }

    #[test]
    fn test_call_rejects_malformed_param_before_sending() {
        let services = Services::load(&LastfmConfig::default(), None).unwrap();
        let err = cmd_call(&services, "artist.getInfo", &["artist".to_string()]).unwrap_err();
        assert!(err.to_string().contains("expected NAME=VALUE"));
    }
}
