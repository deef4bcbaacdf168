//! Kick REST client.
//!
//! Every endpoint goes through one generic dispatcher with automatic bearer
//! injection and a single refresh-and-retry when the platform answers 401.

mod refresh;
mod request;

use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, IgnoredAny};
use serde::Serialize;

use crate::credentials::{Credentials, TokenRefreshObserver};
use crate::{ClientOptions, KickError};

pub use reqwest::{Method, StatusCode};

/// Successful response: the decoded `data` field of the envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response<T> {
    pub result: T,
}

/// Payload for endpoints that return no meaningful data.
///
/// Decodes from any JSON value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmptyResponse;

impl<'de> Deserialize<'de> for EmptyResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(EmptyResponse)
    }
}

/// Kick API client.
///
/// Safe to share between tasks (`Arc<KickClient>`). Credentials can be
/// replaced at any time; concurrent requests that all hit a 401 may each
/// refresh, and the last refresh to finish wins.
pub struct KickClient {
    pub(crate) http: reqwest::Client,
    pub(crate) api_base_url: String,
    pub(crate) auth_base_url: String,
    pub(crate) credentials: Credentials,
}

impl KickClient {
    pub fn new(options: ClientOptions) -> Result<Self, KickError> {
        let http = match options.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = options.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|e| KickError::RequestConstruction(e.to_string()))?
            }
        };

        Ok(Self {
            http,
            api_base_url: options.api_base_url.trim_end_matches('/').to_string(),
            auth_base_url: options.auth_base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(
                options.client_id,
                options.client_secret,
                options.app_access_token,
                options.user_access_token,
                options.user_refresh_token,
            ),
        })
    }

    pub fn set_app_access_token(&self, token: impl Into<String>) {
        self.credentials.set_app_access_token(Some(token.into()));
    }

    pub fn set_user_access_token(&self, token: impl Into<String>) {
        self.credentials.set_user_access_token(Some(token.into()));
    }

    pub fn set_user_refresh_token(&self, token: impl Into<String>) {
        self.credentials.set_user_refresh_token(Some(token.into()));
    }

    pub fn clear_user_tokens(&self) {
        self.credentials.set_user_access_token(None);
        self.credentials.set_user_refresh_token(None);
    }

    pub fn app_access_token(&self) -> Option<String> {
        self.credentials.app_access_token()
    }

    pub fn user_access_token(&self) -> Option<String> {
        self.credentials.user_access_token()
    }

    pub fn user_refresh_token(&self) -> Option<String> {
        self.credentials.user_refresh_token()
    }

    /// Register the observer notified after every automatic token refresh.
    ///
    /// Replaces any previously registered observer.
    pub fn on_user_access_token_refreshed(&self, observer: impl TokenRefreshObserver) {
        self.credentials.set_observer(Arc::new(observer));
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }
}
