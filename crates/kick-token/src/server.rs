//! Login redirect and OAuth callback routes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use kick_client::pkce::{PkceChallenge, generate_state};
use kick_client::{KickClient, Scope, TokenResponse};

/// Logins not completed within this window are forgotten.
const PENDING_LOGIN_TTL: Duration = Duration::from_secs(10 * 60);

struct PendingLogin {
    verifier: String,
    started: Instant,
}

pub struct AppState {
    client: KickClient,
    redirect_uri: String,
    scopes: Vec<Scope>,
    /// Code verifiers of logins in flight, keyed by OAuth state.
    pending: Mutex<HashMap<String, PendingLogin>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(client: KickClient, redirect_uri: String, scopes: Vec<Scope>) -> Self {
        Self {
            client,
            redirect_uri,
            scopes,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn remember(&self, state: String, verifier: String) {
        self.remember_at(state, verifier, Instant::now());
    }

    fn remember_at(&self, state: String, verifier: String, now: Instant) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let before = pending.len();
        pending.retain(|_, login| now.saturating_duration_since(login.started) < PENDING_LOGIN_TTL);
        if pending.len() < before {
            tracing::debug!(expired = before - pending.len(), "Dropped abandoned logins");
        }
        pending.insert(state, PendingLogin { verifier, started: now });
    }

    fn take_verifier(&self, state: &str) -> Option<String> {
        self.take_verifier_at(state, Instant::now())
    }

    fn take_verifier_at(&self, state: &str, now: Instant) -> Option<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(state)
            .filter(|login| now.saturating_duration_since(login.started) < PENDING_LOGIN_TTL)
            .map(|login| login.verifier)
    }
}

type HandlerError = (StatusCode, Json<Value>);

fn err_json(status: StatusCode, message: &str) -> HandlerError {
    (status, Json(json!({ "status": "error", "error": message })))
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/oauth/kick", get(start_login))
        .route("/oauth/kick/", get(start_login))
        .route("/oauth/kick/callback", get(oauth_callback))
        .with_state(state)
}

/// Bind the listener and serve until Ctrl+C.
pub async fn start_server(state: SharedState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Token server listening on http://{addr}");

    axum::serve(listener, create_router(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

/// GET /oauth/kick
async fn start_login(State(state): State<SharedState>) -> Result<Response, HandlerError> {
    let pkce = PkceChallenge::generate()
        .map_err(|e| err_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
    let oauth_state =
        generate_state().map_err(|e| err_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    let url = state
        .client
        .authorize_url(&state.redirect_uri, &oauth_state, &pkce.challenge, &state.scopes)
        .map_err(|e| err_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    state.remember(oauth_state, pkce.verifier);
    tracing::debug!("Redirecting to Kick authorization page");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// GET /oauth/kick/callback
async fn oauth_callback(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<TokenResponse>, HandlerError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| err_json(StatusCode::BAD_REQUEST, "Missing authorization code"))?;
    let verifier = query
        .state
        .as_deref()
        .and_then(|s| state.take_verifier(s))
        .ok_or_else(|| err_json(StatusCode::BAD_REQUEST, "Unknown or expired state"))?;

    let token = state
        .client
        .exchange_code(&state.redirect_uri, &code, &verifier)
        .await
        .map_err(|e| {
            tracing::error!("Code exchange failed: {e}");
            err_json(StatusCode::BAD_GATEWAY, &e.to_string())
        })?;

    tracing::info!(
        expires_in = token.expires_in,
        scope = %token.scope,
        "User access token issued"
    );
    Ok(Json(token))
}

#[cfg(test)]
mod tests {
    use kick_client::ClientOptions;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct Harness {
        base: String,
        state: SharedState,
        http: reqwest::Client,
        kick: MockServer,
    }

    async fn harness() -> Harness {
        let kick = MockServer::start().await;
        let client = KickClient::new(
            ClientOptions::default()
                .with_auth_base_url(kick.uri())
                .with_client_credentials("client-id", "client-secret"),
        )
        .unwrap();
        let state = Arc::new(AppState::new(
            client,
            "http://localhost:3000/oauth/kick/callback".into(),
            vec![Scope::UserRead, Scope::ChatWrite],
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let router = create_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Harness {
            base,
            state,
            http,
            kick,
        }
    }

    async fn login(h: &Harness) -> url::Url {
        let resp = h.http.get(format!("{}/oauth/kick", h.base)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp.headers()[header::LOCATION].to_str().unwrap();
        url::Url::parse(location).unwrap()
    }

    fn param(url: &url::Url, key: &str) -> String {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    fn bare_state() -> AppState {
        let client = KickClient::new(ClientOptions::default()).unwrap();
        AppState::new(client, "http://localhost/cb".into(), vec![Scope::UserRead])
    }

    #[test]
    fn abandoned_logins_are_dropped() {
        let state = bare_state();
        let start = Instant::now();
        state.remember_at("old".into(), "v-old".into(), start);
        state.remember_at("recent".into(), "v-recent".into(), start + Duration::from_secs(60));

        let later = start + PENDING_LOGIN_TTL + Duration::from_secs(1);
        state.remember_at("new".into(), "v-new".into(), later);

        assert_eq!(state.pending.lock().unwrap().len(), 2);
        assert_eq!(state.take_verifier_at("old", later), None);
        assert_eq!(state.take_verifier_at("recent", later).as_deref(), Some("v-recent"));
        assert_eq!(state.take_verifier_at("new", later).as_deref(), Some("v-new"));
    }

    #[test]
    fn expired_login_is_not_accepted() {
        let state = bare_state();
        let start = Instant::now();
        state.remember_at("s".into(), "v".into(), start);

        assert_eq!(state.take_verifier_at("s", start + PENDING_LOGIN_TTL), None);
        assert!(state.pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_redirects_with_pkce_challenge() {
        let h = harness().await;
        let url = login(&h).await;

        assert_eq!(url.path(), "/oauth/authorize");
        assert_eq!(param(&url, "client_id"), "client-id");
        assert_eq!(param(&url, "scope"), "user:read chat:write");
        assert_eq!(param(&url, "code_challenge_method"), "S256");

        let verifier = h.state.take_verifier(&param(&url, "state")).unwrap();
        assert_eq!(
            PkceChallenge::from_verifier(verifier).challenge,
            param(&url, "code_challenge")
        );
    }

    #[tokio::test]
    async fn callback_exchanges_code_once() {
        let h = harness().await;
        let url = login(&h).await;
        let oauth_state = param(&url, "state");

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=the-code"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,"token_type":"Bearer","scope":"user:read chat:write"}"#,
            ))
            .expect(1)
            .mount(&h.kick)
            .await;

        let callback = format!("{}/oauth/kick/callback?code=the-code&state={oauth_state}", h.base);
        let resp = h.http.get(&callback).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&resp.bytes().await.unwrap()).unwrap();
        assert_eq!(body["access_token"], "at");
        assert_eq!(body["refresh_token"], "rt");

        let replay = h.http.get(&callback).send().await.unwrap();
        assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn callback_without_code_is_bad_request() {
        let h = harness().await;
        let resp = h
            .http
            .get(format!("{}/oauth/kick/callback?state=whatever", h.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn callback_with_unknown_state_is_bad_request() {
        let h = harness().await;
        let resp = h
            .http
            .get(format!("{}/oauth/kick/callback?code=abc&state=forged", h.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_exchange_is_bad_gateway() {
        let h = harness().await;
        let url = login(&h).await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"error":"invalid_grant","error_description":"code expired"}"#,
            ))
            .mount(&h.kick)
            .await;

        let resp = h
            .http
            .get(format!(
                "{}/oauth/kick/callback?code=abc&state={}",
                h.base,
                param(&url, "state")
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
