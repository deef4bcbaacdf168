use reqwest::StatusCode;

use super::KickClient;
use super::request::PreparedRequest;
use crate::credentials::TokenRefreshObserver;
use crate::{KickError, TokenResponse};

impl KickClient {
    /// Send with the current bearer token; on 401 refresh once and retry once.
    ///
    /// Without client id, client secret and refresh token the 401 response is
    /// handed back untouched. A failed refresh aborts with `RefreshFailed`.
    /// The retried response is returned as-is, even if it is another 401.
    pub(super) async fn execute(
        &self,
        request: &PreparedRequest,
    ) -> Result<reqwest::Response, KickError> {
        let bearer = self.credentials.bearer();
        let response = self.send_once(request, bearer.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(refresh_token) = self.credentials.refreshable_token() else {
            tracing::debug!(url = %request.url, "Got 401 and no refresh credentials, returning response");
            return Ok(response);
        };

        tracing::warn!(url = %request.url, "Got 401, refreshing user access token");
        drop(response);

        self.refresh_and_store(&refresh_token)
            .await
            .map_err(|e| KickError::RefreshFailed(Box::new(e)))?;

        let bearer = self.credentials.bearer();
        self.send_once(request, bearer.as_deref()).await
    }

    /// Refresh using the stored refresh token, store the new pair and notify
    /// the registered observer.
    ///
    /// Use this to refresh ahead of expiry instead of waiting for a 401.
    pub async fn refresh_user_access_token(&self) -> Result<TokenResponse, KickError> {
        let refresh_token = self
            .credentials
            .user_refresh_token()
            .ok_or(KickError::Configuration("refresh token must be defined"))?;
        self.refresh_and_store(&refresh_token).await
    }

    async fn refresh_and_store(&self, refresh_token: &str) -> Result<TokenResponse, KickError> {
        let token = self.refresh_token(refresh_token).await?;

        let (access_token, refresh_token) = self
            .credentials
            .replace_user_tokens(token.access_token.clone(), token.refresh_token.clone());
        tracing::info!(expires_in = token.expires_in, "User access token refreshed");

        if let Some(observer) = self.credentials.observer() {
            notify_observer(observer, access_token, refresh_token);
        }

        Ok(token)
    }
}

/// Run the observer on a detached blocking task.
fn notify_observer(
    observer: std::sync::Arc<dyn TokenRefreshObserver>,
    access_token: String,
    refresh_token: String,
) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(move || {
                observer.on_user_access_token_refreshed(&access_token, &refresh_token);
            });
        }
        Err(_) => {
            tracing::warn!("No tokio runtime available, running refresh observer on a new thread");
            std::thread::spawn(move || {
                observer.on_user_access_token_refreshed(&access_token, &refresh_token);
            });
        }
    }
}
