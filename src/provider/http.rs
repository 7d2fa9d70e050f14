//! Shared HTTP client and auth utilities.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::warn;

use crate::error::RegistryError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client with the default timeout.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| client_or_fallback(build_client(DEFAULT_TIMEOUT)))
}

/// Fall back to a plain client (no request timeout) when building fails.
fn client_or_fallback(built: Result<reqwest::Client, RegistryError>) -> reqwest::Client {
    match built {
        Ok(client) => client,
        Err(e) => {
            warn!(
                error = %e,
                timeout_secs = DEFAULT_TIMEOUT.as_secs(),
                "HTTP client build failed, falling back to a client without request timeout"
            );
            reqwest::Client::new()
        }
    }
}

/// Build a dedicated client with a custom request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, RegistryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(RegistryError::from)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> RegistryError {
    match status {
        401 | 403 => RegistryError::Authentication(body.to_string()),
        429 => RegistryError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => RegistryError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_body_yields_retry_after() {
        let err = status_to_error(429, r#"{"error":{"retry_after":1.5}}"#);
        assert!(matches!(
            err,
            RegistryError::RateLimited {
                retry_after_ms: Some(1500)
            }
        ));
    }

    #[test]
    fn rate_limit_without_hint() {
        let err = status_to_error(429, "slow down");
        assert!(matches!(
            err,
            RegistryError::RateLimited {
                retry_after_ms: None
            }
        ));
    }

    #[test]
    fn auth_statuses_map_to_authentication() {
        assert!(matches!(
            status_to_error(401, "bad key"),
            RegistryError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(500, "boom"),
            RegistryError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn failed_client_build_falls_back_to_plain_client() {
        let build_error = reqwest::Client::new()
            .get("http://[::1")
            .build()
            .unwrap_err();
        let client = client_or_fallback(Err(RegistryError::from(build_error)));
        assert!(client.get("http://localhost/").build().is_ok());
    }

    #[test]
    fn shared_client_is_built_once() {
        assert!(std::ptr::eq(shared_client(), shared_client()));
    }

    #[test]
    fn bearer_header_is_set() {
        let headers = bearer_headers("sk-test");
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
