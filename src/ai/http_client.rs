//! Shared HTTP Client Module
//!
//! Builds the `reqwest` client used for provider calls. One client is created
//! per provider and reused across analyses so connections and TLS sessions
//! are pooled.

use crate::ai::gemini::ProviderError;
use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client for analysis requests
///
/// Configuration tuned for a few large uploads rather than many small calls:
/// - caller-supplied timeout (video processing can take minutes)
/// - small idle pool, since at most one analysis is in flight
/// - TCP keepalive so long uploads are not dropped by middleboxes
pub fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()?;

    Ok(client)
}
