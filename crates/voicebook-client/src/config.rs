use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_request_timeout_secs() -> u64 {
    60
}

/// Connection settings for the remote booking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service. Endpoint paths are appended to it, so it
    /// should end with `/`; a missing trailing slash is added by the client.
    #[serde(default)]
    pub api_url: String,
    /// Per-request timeout in seconds. Default: 60.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
