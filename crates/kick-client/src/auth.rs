//! OAuth 2.1 operations against the identity host.
//!
//! Handles authorize URL generation (PKCE, S256), authorization code
//! exchange, token refresh, app tokens and revocation.

use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::EmptyResponse;
use crate::enums::{Scope, TokenType, join_scopes, parse_scopes};
use crate::{KickClient, KickError};

const AUTHORIZE_PATH: &str = "/oauth/authorize";
const TOKEN_PATH: &str = "/oauth/token";
const REVOKE_PATH: &str = "/oauth/revoke";

/// Token endpoint response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    /// Absent for app tokens and for refreshes that keep the old refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Unix timestamp at which the access token expires, counted from now.
    pub fn expires_at(&self) -> i64 {
        Utc::now().timestamp() + self.expires_in
    }

    /// Granted scopes. Unknown scope names fail the parse.
    pub fn scopes(&self) -> Result<Vec<Scope>, KickError> {
        parse_scopes(&self.scope)
    }
}

impl KickClient {
    /// Build the browser URL that starts the authorization-code flow.
    pub fn authorize_url(
        &self,
        redirect_uri: &str,
        state: &str,
        code_challenge: &str,
        scopes: &[Scope],
    ) -> Result<String, KickError> {
        let client_id = self
            .credentials
            .client_id()
            .ok_or(KickError::Configuration("client ID must be set"))?;

        let mut url = Url::parse(&format!("{}{AUTHORIZE_PATH}", self.auth_base_url))
            .map_err(|e| KickError::RequestConstruction(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state)
            .append_pair("scope", &join_scopes(scopes))
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "S256");
        Ok(url.to_string())
    }

    /// Exchange an authorization code (plus PKCE verifier) for user tokens.
    pub async fn exchange_code(
        &self,
        redirect_uri: &str,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, KickError> {
        let (client_id, client_secret) = self.client_credentials()?;
        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ];
        self.dispatch_auth(TOKEN_PATH, StatusCode::OK, &form).await
    }

    /// Run the refresh-token grant. Does not touch the stored credentials.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, KickError> {
        let (client_id, client_secret) = self.client_credentials()?;
        if refresh_token.is_empty() {
            return Err(KickError::Configuration("refresh token must be defined"));
        }

        tracing::info!("Refreshing Kick OAuth token");
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        self.dispatch_auth(TOKEN_PATH, StatusCode::OK, &form).await
    }

    /// Obtain an app access token (client credentials grant) and store it.
    pub async fn request_app_access_token(&self) -> Result<TokenResponse, KickError> {
        let (client_id, client_secret) = self.client_credentials()?;
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
        ];
        let token: TokenResponse = self.dispatch_auth(TOKEN_PATH, StatusCode::OK, &form).await?;
        self.credentials
            .set_app_access_token(Some(token.access_token.clone()));
        Ok(token)
    }

    /// Revoke an access or refresh token.
    pub async fn revoke_token(&self, token_type: TokenType, token: &str) -> Result<(), KickError> {
        let form = [("token", token), ("token_hint_type", token_type.as_str())];
        let _: EmptyResponse = self.dispatch_auth(REVOKE_PATH, StatusCode::OK, &form).await?;
        Ok(())
    }

    fn client_credentials(&self) -> Result<(String, String), KickError> {
        let client_id = self
            .credentials
            .client_id()
            .ok_or(KickError::Configuration("client ID must be set"))?;
        let client_secret = self
            .credentials
            .client_secret()
            .ok_or(KickError::Configuration("client secret must be set"))?;
        Ok((client_id, client_secret))
    }
}
