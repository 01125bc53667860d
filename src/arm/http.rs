//! HTTP utilities for Azure REST API calls

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Per-request budget, enforced on every call the tool makes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Walk back to a char boundary so multibyte bodies don't panic
        let mut cut = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..cut],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Azure API calls
#[derive(Clone)]
pub struct ArmHttpClient {
    client: Client,
}

impl ArmHttpClient {
    /// Create a new HTTP client with the request timeout applied
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("azchaos/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make an authorized GET request to an Azure API
    pub async fn get(&self, url: &str, authorization: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }

    /// Make an authorized POST request to an Azure API
    pub async fn post(&self, url: &str, authorization: &str, body: Option<&Value>) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).header(AUTHORIZATION, authorization);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(anyhow::anyhow!("API request failed: {}", status));
        }

        // ARM power operations return 202 Accepted with an empty body
        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }

    /// Make an unauthenticated form POST (used for the token endpoint)
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!("POST {} (form)", url);

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("token endpoint error: {} - {}", status, sanitize_for_log(&body));
            return Err(anyhow::anyhow!("token request failed: {}", status));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let logged = sanitize_for_log(&body);
        assert!(logged.contains("truncated, 500 bytes total"));
        assert!(logged.len() < body.len());
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("ok\r\n\u{7}"), "ok");
    }

    #[test]
    fn sanitize_truncates_multibyte_bodies_on_char_boundaries() {
        // Place a two-byte character across the truncation boundary
        let body = format!("{}é tail", "x".repeat(MAX_LOG_BODY_LENGTH - 1));
        let logged = sanitize_for_log(&body);
        assert!(logged.contains(&format!("truncated, {} bytes total", body.len())));

        // And directly at it
        let body = format!("{}日本語", "x".repeat(MAX_LOG_BODY_LENGTH));
        let logged = sanitize_for_log(&body);
        assert!(logged.contains("truncated"));
    }
}
