//! Local helper that runs the Kick OAuth authorization-code flow with PKCE.
//!
//! Open `http://localhost:<port>/oauth/kick` in a browser, approve the app,
//! and the callback page prints the issued token pair.

mod config;
mod server;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kick_client::{ClientOptions, KickClient};

use crate::config::TokenServerConfig;
use crate::server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {e}");
    }

    let config = TokenServerConfig::from_env()?;
    let options = ClientOptions::from_env();
    if options.client_id.is_none() || options.client_secret.is_none() {
        anyhow::bail!("KICK_CLIENT_ID and KICK_CLIENT_SECRET must be set");
    }
    let client = KickClient::new(options)?;

    tracing::info!(
        port = config.port,
        scopes = %config.scopes_display(),
        "Open http://localhost:{}/oauth/kick to generate a user access token",
        config.port
    );

    let state = Arc::new(AppState::new(client, config.redirect_uri.clone(), config.scopes.clone()));
    server::start_server(state, config.port).await
}
