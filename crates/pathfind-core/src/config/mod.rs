//! Client configuration shared by every PathFind front end.
//!
//! `ClientConfig` carries the server endpoint plus the knobs that change how
//! the HTTP client and the bookmark list store behave.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option, strip_trailing_slash};
use crate::{Error, Result};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// What the store does with a list response that was requested under a query
/// that has since been replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Drop responses belonging to an older query.
    #[default]
    DiscardStale,
    /// Apply every response in arrival order.
    AcceptAny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Server base URL as entered by the user (may carry a trailing slash)
    pub server_url: String,
    #[serde(default)]
    pub stale_responses: StaleResponsePolicy,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    /// Build a config for `server_url` with default policies.
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let server_url = normalize_server_url(server_url.into())?;
        Ok(Self {
            server_url,
            stale_responses: StaleResponsePolicy::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        })
    }

    #[must_use]
    pub const fn with_stale_responses(mut self, policy: StaleResponsePolicy) -> Self {
        self.stale_responses = policy;
        self
    }

    /// Base URL used to build API request paths.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        strip_trailing_slash(&self.server_url)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse a JSON config payload and validate it.
    pub fn from_json(payload: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(payload)?;
        config.server_url = normalize_server_url(config.server_url)?;
        if config.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Trim and validate a server URL; keeps a trailing slash if present.
pub fn normalize_server_url(raw: String) -> Result<String> {
    let value = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("server_url is required".to_string()))?;
    if is_http_url(&value) {
        Ok(value)
    } else {
        Err(Error::Config(
            "server_url must include http:// or https://".to_string(),
        ))
    }
}
