//! Google Generative Language API client configuration with sensible defaults.

use crate::error::{Result, TychoError};
use std::time::Duration;

/// Base URL for the Generative Language REST API.
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an HTTP client with configured timeout.
///
/// Uses a 5-minute timeout by default to prevent hung API calls.
pub fn create_client() -> reqwest::Client {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Read the Gemini API key from the environment.
///
/// `GOOGLE_API_KEY` is checked first (the name the Google SDKs use), then
/// `GEMINI_API_KEY` as an alias.
pub fn api_key() -> Result<String> {
    for var in ["GOOGLE_API_KEY", "GEMINI_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                return Ok(key);
            }
        }
    }
    Err(TychoError::Config(
        "GOOGLE_API_KEY not set. Set it with: export GOOGLE_API_KEY='...'".to_string(),
    ))
}
