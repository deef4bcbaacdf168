use anyhow::Context;

use kick_client::Scope;
use kick_client::enums::{join_scopes, parse_scopes};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SCOPES: &str = "user:read";

/// Settings for the local token server, read from `KICK_TOKEN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenServerConfig {
    pub port: u16,
    pub redirect_uri: String,
    pub scopes: Vec<Scope>,
}

impl TokenServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("KICK_TOKEN_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid KICK_TOKEN_PORT {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let redirect_uri = lookup("KICK_REDIRECT_URI")
            .unwrap_or_else(|| format!("http://localhost:{port}/oauth/kick/callback"));

        let raw_scopes = lookup("KICK_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.to_string());
        let scopes = parse_scopes(&raw_scopes).context("invalid KICK_SCOPES")?;

        Ok(Self {
            port,
            redirect_uri,
            scopes,
        })
    }

    pub fn scopes_display(&self) -> String {
        join_scopes(&self.scopes)
    }
}
