//! Remote backend configuration.

use serde::{Deserialize, Serialize};

pub const ENV_REMOTE_URL: &str = "CAMPUSDESK_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "CAMPUSDESK_REMOTE_KEY";
pub const ENV_REMOTE_TIMEOUT: &str = "CAMPUSDESK_REMOTE_TIMEOUT_SECS";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the backend (e.g. `https://abc.example.co`).
    pub url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup(ENV_REMOTE_URL).unwrap_or_default(),
            api_key: lookup(ENV_REMOTE_KEY).unwrap_or_default(),
            timeout_secs: lookup(ENV_REMOTE_TIMEOUT)
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Whether credentials are present and syntactically valid: an
    /// `http`/`https` URL with a host, and a key that is not empty or a
    /// template placeholder.
    pub fn is_configured(&self) -> bool {
        self.url_is_valid() && self.key_is_valid()
    }

    fn url_is_valid(&self) -> bool {
        match reqwest::Url::parse(self.url.trim()) {
            Ok(url) => {
                matches!(url.scheme(), "http" | "https")
                    && url.host_str().is_some_and(|h| !h.is_empty())
            }
            Err(_) => false,
        }
    }

    fn key_is_valid(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty()
            && !key.to_ascii_lowercase().starts_with("your-")
            && !key.to_ascii_lowercase().contains("placeholder")
    }
}
