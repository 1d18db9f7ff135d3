//! Test utilities and fixtures for lastfm-provider tests.
//!
//! Credential fixtures, config file helpers, mock limiter implementations
//! and a one-shot HTTP stub for exercising the client without the network.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{write_config, VALID_KEY};
//!
//! #[test]
//! fn test_something() {
//!     let (path, _dir) = write_config(&format!("[lastfm]\napi_key = \"{VALID_KEY}\"\n"));
//!     // ... test logic
//! }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::lastfm::{LimiterProvider, RateLimiter};

/// API key long enough to pass validation.
pub const VALID_KEY: &str = "LastFmApiKey2024Token123456789";

/// API secret long enough to pass validation.
pub const VALID_SECRET: &str = "LastFmApiSecret2024Token123456789";

/// Writes `contents` to a config file in a fresh temporary directory.
///
/// Keep the TempDir alive for the duration of your test.
pub fn write_config(contents: &str) -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).expect("Failed to write test config");
    (path, dir)
}

/// Limiter that never waits and counts how often it was consulted.
#[derive(Debug, Default)]
pub struct RecordingLimiter {
    acquired: AtomicUsize,
}

impl RecordingLimiter {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for RecordingLimiter {
    async fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider that knows a fixed set of limiter ids and records every request.
#[derive(Debug, Default)]
pub struct StaticLimiters {
    ids: Vec<String>,
    requested: Mutex<Vec<(String, String)>>,
}

impl StaticLimiters {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            requested: Mutex::default(),
        }
    }

    /// (service id, limiter key) pairs passed to `create`, in call order.
    pub fn requested(&self) -> Vec<(String, String)> {
        self.requested.lock().unwrap().clone()
    }
}

impl LimiterProvider for StaticLimiters {
    fn create(&self, service_id: &str, key: &str) -> Option<Arc<dyn RateLimiter>> {
        self.requested
            .lock()
            .unwrap()
            .push((service_id.to_string(), key.to_string()));
        if !self.ids.iter().any(|id| id == service_id) {
            return None;
        }
        Some(Arc::new(RecordingLimiter::default()))
    }
}

/// Serves a single JSON response on a local port.
///
/// Returns the base URL to point the client at and a handle resolving to
/// the raw request head that was received.
pub async fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("Failed to accept request");

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.expect("Failed to read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("Failed to write response");
        let _ = stream.shutdown().await;

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}/2.0/", addr), handle)
}

/// Base URL of a local port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let addr = listener.local_addr().expect("Probe port has no address");
    drop(listener);
    format!("http://{}/2.0/", addr)
}
