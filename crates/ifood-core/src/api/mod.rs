//! iFood marketplace HTTP client.
//!
//! - `auth`: OTP request/claim, authentication and token refresh (unauthenticated)
//! - `catalog`: addresses, home feed and merchant page (bearer-authenticated)
//!
//! Every operation is a single round trip. Nothing is retried; failures
//! come back as [`IfoodError`](crate::IfoodError) for the caller to handle.

mod auth;
mod catalog;
mod shared;
pub mod types;

use anyhow::Result;
pub use shared::resolve_base_url;
pub use types::{
    Address, Coordinates, HomeFeedEntry, HomeFeedPage, Merchant, MerchantPage, TokenPair,
};

use crate::config::Config;

/// Default base URL for the iFood marketplace API.
pub const DEFAULT_BASE_URL: &str = "https://marketplace.ifood.com.br";

/// Connection and request parameters for the marketplace API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub tenant_id: String,
    pub device_id: String,
    pub channel: String,
    pub home_alias: String,
    pub home_page_size: u32,
    pub accept_language: String,
    pub platform: String,
}

impl ApiConfig {
    /// Builds the API config from the user config.
    ///
    /// Base URL resolution order:
    /// 1. `IFOOD_BASE_URL` env var (if set and non-empty)
    /// 2. `config.base_url` (if Some and non-empty)
    /// 3. Default: `https://marketplace.ifood.com.br`
    ///
    /// # Errors
    /// Returns an error if the chosen base URL does not parse.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url =
            resolve_base_url(config.base_url.as_deref(), "IFOOD_BASE_URL", DEFAULT_BASE_URL)?;

        Ok(Self {
            base_url,
            tenant_id: config.tenant_id.clone(),
            device_id: config.device_id.clone(),
            channel: config.channel.clone(),
            home_alias: config.home_alias.clone(),
            home_page_size: config.home_page_size,
            accept_language: config.accept_language.clone(),
            platform: config.platform.clone(),
        })
    }

    /// Config with defaults pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let defaults = Config::default();
        Self {
            base_url: base_url.into(),
            tenant_id: defaults.tenant_id,
            device_id: defaults.device_id,
            channel: defaults.channel,
            home_alias: defaults.home_alias,
            home_page_size: defaults.home_page_size,
            accept_language: defaults.accept_language,
            platform: defaults.platform,
        }
    }
}

/// iFood marketplace API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `IFOOD_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// Use `IFOOD_BASE_URL` or config to point at a mock server.
    pub fn new(config: ApiConfig) -> Self {
        #[cfg(test)]
        assert!(
            config.base_url != DEFAULT_BASE_URL,
            "Tests must not use the production iFood API!\n\
             Point the client at a mock server (e.g., wiremock).\n\
             Found base_url: {}",
            config.base_url
        );

        #[cfg(not(test))]
        assert!(
            !(std::env::var("IFOOD_BLOCK_REAL_API").is_ok_and(|v| v == "1")
                && config.base_url == DEFAULT_BASE_URL),
            "IFOOD_BLOCK_REAL_API=1 but trying to use production iFood API!\n\
             Set IFOOD_BASE_URL to a mock server.\n\
             Found base_url: {}",
            config.base_url
        );

        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}
