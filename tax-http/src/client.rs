use std::time::Duration;

use reqwest::Client;

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client.
///
/// Falls back to a client without a timeout if the builder fails.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
