//! Helpers shared by the auth and catalog endpoints.

use anyhow::Context;
use reqwest::Response;

use crate::error::{IfoodError, Result};

/// Resolves the base URL from env, config, or default.
///
/// # Arguments
/// * `config_base_url` - Value from the config file (if any)
/// * `env_var` - Environment variable consulted first
/// * `default_url` - Default URL if neither env nor config is set
///
/// # Errors
/// Returns an error if the chosen URL is not well-formed.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
) -> anyhow::Result<String> {
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(default_url.to_string())
}

fn validate_url(url: &str) -> anyhow::Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid iFood base URL: {url}"))?;
    Ok(())
}

/// Sends a request, mapping transport failures to `Remote`.
pub(super) async fn send(
    request: reqwest::RequestBuilder,
    operation: &'static str,
) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| IfoodError::network(operation, &e))
}

/// Turns any non-2xx response into a `Remote` error carrying the status.
pub(super) async fn ensure_success(response: Response, operation: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(IfoodError::Remote {
        operation,
        status: Some(status.as_u16()),
        message,
    })
}

/// Reads the whole body as text.
pub(super) async fn body_text(response: Response, operation: &'static str) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| IfoodError::network(operation, &e))
}
