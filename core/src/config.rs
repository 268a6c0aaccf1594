use std::time::Duration;

use serde::Serialize;

/// Application id of the official Simplenote apps on Simperium.
pub const DEFAULT_APP_ID: &str = "chalk-bump-f49";

pub const DEFAULT_LEGACY_ROOT: &str = "https://simple-note.appspot.com";
pub const DEFAULT_AUTH_ROOT: &str = "https://auth.simperium.com/1";
pub const DEFAULT_API_ROOT: &str = "https://api.simperium.com/1";

/// The legacy server needs a long pause after a 500 before it serves again.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Number of records requested per index page.
pub const PAGE_SIZE: usize = 100;

/// Server roots. Trailing slashes are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoints {
    /// Root of the legacy api (`/api/login`, `/api2/...`)
    pub legacy_root: String,
    /// Root of the Simperium auth service (`/<appId>/authorize/`)
    pub auth_root: String,
    /// Root of the Simperium data api (`/<appId>/Note/...`)
    pub api_root: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            legacy_root: DEFAULT_LEGACY_ROOT.to_string(),
            auth_root: DEFAULT_AUTH_ROOT.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every root at one base url, e.g. a mock server.
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Endpoints {
            legacy_root: base.to_string(),
            auth_root: format!("{}/auth/1", base),
            api_root: format!("{}/api/1", base),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    pub app_id: String,
    /// Pause before the single retry of a GET/DELETE that returned 500.
    pub retry_delay: Duration,
    /// Request deadline for the underlying HTTP client. `None` means no deadline.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoints: Endpoints::default(),
            app_id: DEFAULT_APP_ID.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
