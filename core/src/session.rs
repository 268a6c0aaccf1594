use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::config::Endpoints;
use crate::error::{from_json, Error, Result};
use crate::transport::Transport;
use crate::wire::simperium::LoginResponse;

pub const API_KEY_HEADER: &str = "X-Simperium-API-Key";
pub const TOKEN_HEADER: &str = "X-Simperium-Token";

/// Who we log in as. Never changes after the client is built.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    /// Needed by the Simperium api only
    pub api_key: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Token for the legacy api, sent as `auth`/`email` query parameters
#[derive(Debug, Clone)]
pub struct LegacySession {
    pub token: String,
    pub email: String,
}

impl LegacySession {
    pub fn login(transport: &Transport, endpoints: &Endpoints, creds: &Credentials) -> Result<Self> {
        let url = endpoints.legacy_login_url();
        let body = legacy_login_body(&creds.user, &creds.password);
        debug!(user = %creds.user, "logging in to legacy api");

        let response = transport.post(&url, &[], body)?;
        let token = String::from_utf8(response)
            .map_err(|_| Error::Auth("login token is not valid UTF-8".to_string()))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::Auth("login returned an empty token".to_string()));
        }

        Ok(LegacySession {
            token: token.to_string(),
            email: creds.user.clone(),
        })
    }

    /// `auth=<token>&email=<user>` as flat query arguments
    pub fn auth_args(&self) -> [&str; 4] {
        ["auth", self.token.as_str(), "email", self.email.as_str()]
    }
}

/// `base64("email=<user>&password=<pwd>")`, padded standard alphabet
pub fn legacy_login_body(user: &str, password: &str) -> String {
    STANDARD.encode(format!("email={}&password={}", user, password))
}

/// Bearer token for the Simperium api
#[derive(Debug, Clone)]
pub struct SimperiumSession {
    pub username: String,
    pub access_token: String,
    pub user_id: String,
}

impl SimperiumSession {
    pub fn login(
        transport: &Transport,
        endpoints: &Endpoints,
        app_id: &str,
        creds: &Credentials,
    ) -> Result<Self> {
        let api_key = creds
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Auth("an API key is required".to_string()))?;
        let url = endpoints.authorize_url(app_id);
        let body = serde_json::json!({
            "username": creds.user,
            "password": creds.password,
        })
        .to_string();
        debug!(user = %creds.user, app_id, "authorizing with simperium");

        let response = transport.post(
            &url,
            &[
                (API_KEY_HEADER, api_key),
                ("Content-Type", "application/json"),
            ],
            body,
        )?;
        let login: LoginResponse = from_json(&response)
            .map_err(|e| Error::Auth(format!("unexpected authorize response: {}", e)))?;
        if login.access_token.is_empty() {
            return Err(Error::Auth("authorize returned an empty access token".to_string()));
        }

        Ok(SimperiumSession {
            username: login.username,
            access_token: login.access_token,
            user_id: login.userid,
        })
    }

    pub fn token_header(&self) -> (&'static str, &str) {
        (TOKEN_HEADER, &self.access_token)
    }
}
