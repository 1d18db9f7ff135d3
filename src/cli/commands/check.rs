//! Client configuration report.

use crate::lastfm::{AuthMode, LastFmClient};
use crate::services::{CLIENT_SERVICE_ID, Services};

/// Print how the client was configured.
pub fn cmd_check(services: &Services) {
    let client = services.client();
    for line in report(client) {
        println!("{}", line);
    }
}

fn report(client: &LastFmClient) -> Vec<String> {
    let mut lines = vec![
        format!("Service:       {}", CLIENT_SERVICE_ID),
        format!("Mode:          {}", client.mode()),
    ];

    if client.mode() == AuthMode::Authenticated {
        let session = if client.has_session() { "attached" } else { "none" };
        lines.push(format!("Session:       {}", session));
    }

    lines.push(format!(
        "Rate limiting: {}",
        if client.is_rate_limited() { "enabled" } else { "disabled" }
    ));
    lines.push(format!(
        "User-Agent:    {}",
        client.options().user_agent().unwrap_or("(default)")
    ));
    if let Some(timeout) = client.options().timeout {
        lines.push(format!("Timeout:       {}s", timeout.as_secs()));
    }
    lines.push(format!("Endpoint:      {}", client.base_url()));

    if client.mode() == AuthMode::Anonymous {
        lines.push(String::new());
        lines.push("No API key configured; only unauthenticated calls are possible.".to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lastfm::{ClientOptions, build_client};
    use crate::test_utils::{VALID_KEY, VALID_SECRET};

    #[test]
    fn test_report_authenticated_with_session() {
        let client = build_client(
            Some(VALID_KEY),
            Some(VALID_SECRET),
            Some("session-123"),
            ClientOptions::default().with_user_agent("Report/1.0"),
        )
        .unwrap();

        let lines = report(&client);

        assert!(lines.iter().any(|l| l.ends_with("authenticated")));
        assert!(lines.iter().any(|l| l.ends_with("attached")));
        assert!(lines.iter().any(|l| l.ends_with("Report/1.0")));
        assert!(lines.iter().any(|l| l.ends_with("disabled")));
    }

    #[test]
    fn test_report_anonymous_hints_at_credentials() {
        let client = build_client(None, None, None, ClientOptions::default()).unwrap();

        let lines = report(&client);

        assert!(lines.iter().any(|l| l.ends_with("anonymous")));
        assert!(!lines.iter().any(|l| l.starts_with("Session")));
        assert!(lines.iter().any(|l| l.starts_with("No API key configured")));
    }
}
