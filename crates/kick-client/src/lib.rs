//! Kick public API client library.
//!
//! Provides a typed REST client with bearer-token injection and a single
//! 401-triggered token refresh, OAuth/PKCE helpers for the identity host,
//! and signature verification for inbound webhook events.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod enums;
pub mod error;
pub mod pkce;
pub mod webhook;

pub use auth::TokenResponse;
pub use client::{EmptyResponse, KickClient, Response};
pub use config::ClientOptions;
pub use credentials::TokenRefreshObserver;
pub use enums::{LivestreamSort, MessageType, Scope, SubscriptionMethod, SubscriptionName, TokenType};
pub use error::{ApiError, KickError};
pub use webhook::{WebhookEvent, WebhookVerifier, WebhookVerifierOptions};

/// Default REST host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.kick.com";

/// Default identity/OAuth host.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://id.kick.com";
