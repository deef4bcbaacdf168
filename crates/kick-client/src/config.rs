//! Client configuration: defaults, builder helpers and environment loading.

use std::time::Duration;

use crate::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};

/// Options for [`crate::KickClient::new`].
///
/// Every credential is optional. A client with only an app token can call
/// public endpoints; automatic refresh needs client id, client secret and a
/// user refresh token.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub auth_base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub app_access_token: Option<String>,
    pub user_access_token: Option<String>,
    pub user_refresh_token: Option<String>,
    /// Applied to the internally built HTTP client only.
    pub timeout: Option<Duration>,
    /// Caller-provided HTTP client. When set, `timeout` is ignored.
    pub http: Option<reqwest::Client>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.into(),
            client_id: None,
            client_secret: None,
            app_access_token: None,
            user_access_token: None,
            user_refresh_token: None,
            timeout: None,
            http: None,
        }
    }
}

impl ClientOptions {
    /// Defaults overridden by `KICK_*` environment variables.
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Some(v) = env_value("KICK_API_BASE_URL") {
            options.api_base_url = v;
        }
        if let Some(v) = env_value("KICK_AUTH_BASE_URL") {
            options.auth_base_url = v;
        }
        options.client_id = env_value("KICK_CLIENT_ID");
        options.client_secret = env_value("KICK_CLIENT_SECRET");
        options.app_access_token = env_value("KICK_APP_ACCESS_TOKEN");
        options.user_access_token = env_value("KICK_USER_ACCESS_TOKEN");
        options.user_refresh_token = env_value("KICK_USER_REFRESH_TOKEN");

        if let Some(v) = env_value("KICK_HTTP_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) => options.timeout = Some(Duration::from_secs(secs)),
                Err(_) => tracing::warn!(value = %v, "Ignoring invalid KICK_HTTP_TIMEOUT_SECS"),
            }
        }

        options
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into();
        self
    }

    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_app_access_token(mut self, token: impl Into<String>) -> Self {
        self.app_access_token = Some(token.into());
        self
    }

    pub fn with_user_tokens(
        mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.user_access_token = Some(access_token.into());
        self.user_refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_user_access_token(mut self, token: impl Into<String>) -> Self {
        self.user_access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
