//! Login, signup and logout flows.
//!
//! These bind the backend's auth endpoints to the identity slot of the
//! [`PreferenceStore`]. Navigation is returned to the caller as data; the
//! flows never drive the presentation layer themselves.

use crate::backend::{BackendError, NewsBackend};
use crate::prefs::PreferenceStore;
use crate::types::Identity;
use std::sync::Arc;

/// Where the presentation layer should navigate after an auth transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthNavigation {
    Chat,
    Login,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the credentials and said why.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to connect to server")]
    Connect,
}

fn map_backend_error(err: BackendError) -> AuthError {
    match err {
        BackendError::Rejected(message) => AuthError::Rejected(message),
        other => {
            tracing::warn!("auth request failed: {other}");
            AuthError::Connect
        }
    }
}

pub struct AuthFlow {
    backend: Arc<dyn NewsBackend>,
    prefs: PreferenceStore,
}

impl AuthFlow {
    pub fn new(backend: Arc<dyn NewsBackend>, prefs: PreferenceStore) -> Self {
        Self { backend, prefs }
    }

    /// On success the identity is stored for the rest of the session (and
    /// across reloads) before it is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let user = self
            .backend
            .login(email, password)
            .await
            .map_err(map_backend_error)?;
        self.prefs.set_identity(user.clone());
        Ok(user)
    }

    /// Signup does not log the user in; the caller navigates to login.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.backend
            .signup(username, email, password)
            .await
            .map_err(map_backend_error)
    }

    pub fn logout(&self) -> AuthNavigation {
        self.prefs.clear_identity();
        AuthNavigation::Login
    }
}
