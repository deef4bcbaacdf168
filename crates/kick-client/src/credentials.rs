//! Shared credential cell and the refresh-notification observer.
//!
//! Requests read the bearer token under a short read lock; the refresh
//! coordinator swaps the user token pair under a write lock. Locks are never
//! held across an `.await`.

use std::sync::{Arc, PoisonError, RwLock};

/// Receives the new user token pair after an automatic refresh.
///
/// Called on a detached blocking task, so slow implementations (for example
/// persisting the pair to disk) never delay the request that triggered the
/// refresh.
pub trait TokenRefreshObserver: Send + Sync + 'static {
    fn on_user_access_token_refreshed(&self, access_token: &str, refresh_token: &str);
}

impl<F> TokenRefreshObserver for F
where
    F: Fn(&str, &str) + Send + Sync + 'static,
{
    fn on_user_access_token_refreshed(&self, access_token: &str, refresh_token: &str) {
        self(access_token, refresh_token)
    }
}

#[derive(Debug, Default, Clone)]
struct CredentialState {
    client_id: Option<String>,
    client_secret: Option<String>,
    app_access_token: Option<String>,
    user_access_token: Option<String>,
    user_refresh_token: Option<String>,
}

/// Client id, client secret and the current token set.
pub(crate) struct Credentials {
    state: RwLock<CredentialState>,
    observer: RwLock<Option<Arc<dyn TokenRefreshObserver>>>,
}

impl Credentials {
    pub(crate) fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        app_access_token: Option<String>,
        user_access_token: Option<String>,
        user_refresh_token: Option<String>,
    ) -> Self {
        Self {
            state: RwLock::new(CredentialState {
                client_id: non_empty(client_id),
                client_secret: non_empty(client_secret),
                app_access_token: non_empty(app_access_token),
                user_access_token: non_empty(user_access_token),
                user_refresh_token: non_empty(user_refresh_token),
            }),
            observer: RwLock::new(None),
        }
    }

    /// Token for the `Authorization` header. The user token wins over the app token.
    pub(crate) fn bearer(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .user_access_token
            .clone()
            .or_else(|| state.app_access_token.clone())
    }

    pub(crate) fn client_id(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client_id
            .clone()
    }

    pub(crate) fn client_secret(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client_secret
            .clone()
    }

    pub(crate) fn user_access_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_access_token
            .clone()
    }

    pub(crate) fn user_refresh_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_refresh_token
            .clone()
    }

    pub(crate) fn app_access_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .app_access_token
            .clone()
    }

    /// The stored refresh token, but only when client id and secret are also set.
    pub(crate) fn refreshable_token(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.client_id.is_none() || state.client_secret.is_none() {
            return None;
        }
        state.user_refresh_token.clone()
    }

    pub(crate) fn set_app_access_token(&self, token: Option<String>) {
        self.write(|state| state.app_access_token = non_empty(token));
    }

    pub(crate) fn set_user_access_token(&self, token: Option<String>) {
        self.write(|state| state.user_access_token = non_empty(token));
    }

    pub(crate) fn set_user_refresh_token(&self, token: Option<String>) {
        self.write(|state| state.user_refresh_token = non_empty(token));
    }

    /// Swap in a refreshed user token pair and return the pair now stored.
    ///
    /// A refresh response without a refresh token keeps the previous one.
    pub(crate) fn replace_user_tokens(
        &self,
        access_token: String,
        refresh_token: Option<String>,
    ) -> (String, String) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.user_access_token = Some(access_token.clone());
        if let Some(refresh_token) = non_empty(refresh_token) {
            state.user_refresh_token = Some(refresh_token);
        }
        let refresh_token = state.user_refresh_token.clone().unwrap_or_default();
        (access_token, refresh_token)
    }

    pub(crate) fn set_observer(&self, observer: Arc<dyn TokenRefreshObserver>) {
        *self.observer.write().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    pub(crate) fn observer(&self) -> Option<Arc<dyn TokenRefreshObserver>> {
        self.observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, apply: impl FnOnce(&mut CredentialState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
