// src/session.rs
//! Session state and the transitions that drive it. All credential-store
//! writes and every bearer-header mutation on the API client happen here,
//! so requests can never disagree with the last known session state.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::credentials::CredentialStore;
use crate::types::{AuthResponse, User};

const LOGIN_ENDPOINT: &str = "/api/auth/login/";
const REGISTER_ENDPOINT: &str = "/api/auth/register/";
const PROFILE_ENDPOINT: &str = "/api/auth/profile/";

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

#[derive(Debug, Clone)]
pub enum Session {
    /// Startup: a persisted credential may still be under verification.
    Bootstrapping,
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Local precondition failed; nothing was sent to the server.
    #[error("{0}")]
    Validation(String),
    /// Rejected by the server, message ready to render.
    #[error("{0}")]
    Rejected(String),
    /// Registration rejected with a field-error payload. Passed through
    /// unprocessed so the caller decides how to render each field.
    #[error("Registration failed")]
    Fields(serde_json::Value),
    #[error("Failed to store credentials: {0}")]
    Store(String),
}

pub struct SessionManager {
    api: Arc<ApiClient>,
    store: CredentialStore,
    state: Session,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, store: CredentialStore) -> Self {
        Self {
            api,
            store,
            state: Session::Bootstrapping,
        }
    }

    pub fn state(&self) -> &Session {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Reconcile the credential store with the server on startup. No stored
    /// access token means no network call at all; a stored token that the
    /// profile endpoint rejects is treated as expired and cleared, never
    /// retried.
    pub async fn bootstrap(&mut self) {
        let Some(token) = self.store.access_token() else {
            self.state = Session::Unauthenticated;
            return;
        };

        self.api.set_auth_token(&token);
        match self.api.get::<User>(PROFILE_ENDPOINT).await {
            Ok(user) => {
                info!("Session restored for {}", user.email);
                self.state = Session::Authenticated(user);
            }
            Err(e) => {
                warn!("Stored credential rejected, logging out: {}", e);
                self.logout();
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let payload = json!({ "email": email, "password": password });
        match self
            .api
            .post_json::<_, AuthResponse>(LOGIN_ENDPOINT, &payload)
            .await
        {
            Ok(auth) => self.establish(auth),
            Err(e) => {
                let message = e
                    .field_message("non_field_errors")
                    .unwrap_or_else(|| LOGIN_FALLBACK.to_string());
                Err(AuthError::Rejected(message))
            }
        }
    }

    pub async fn register(
        &mut self,
        email: &str,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AuthError> {
        if password != password_confirm {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        let payload = json!({
            "email": email,
            "username": username,
            "password": password,
            "password_confirm": password_confirm,
        });
        match self
            .api
            .post_json::<_, AuthResponse>(REGISTER_ENDPOINT, &payload)
            .await
        {
            Ok(auth) => self.establish(auth),
            Err(e) => match e.body() {
                Some(body) => Err(AuthError::Fields(body.clone())),
                None => Err(AuthError::Rejected(REGISTER_FALLBACK.to_string())),
            },
        }
    }

    /// Synchronous and infallible: drop the stored pair, drop the bearer,
    /// forget the user.
    pub fn logout(&mut self) {
        self.store.clear();
        self.api.clear_auth_token();
        self.state = Session::Unauthenticated;
    }

    // Tokens are persisted before the bearer is set, and the bearer before
    // any dependent request can go out, so a request issued right after
    // login always carries the new credential.
    fn establish(&mut self, auth: AuthResponse) -> Result<(), AuthError> {
        self.store
            .save(&auth.tokens)
            .map_err(|e| AuthError::Store(format!("{:#}", e)))?;
        self.api.set_auth_token(&auth.tokens.access);
        info!("Authenticated as {}", auth.user.email);
        self.state = Session::Authenticated(auth.user);
        Ok(())
    }
}
