use crate::config::Config;
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,

    #[error("{0}")]
    Rejected(String),

    #[error("An unexpected error occurred: {0}")]
    Transport(String),

    #[error("no signed-in session")]
    NoSession,
}

/// A signed-in operator session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Whether the dashboard may be shown
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Session lookup still in flight
    Resolving,
    SignedOut,
    SignedIn(Session),
}

/// Wraps the application behind a session-present check
#[derive(Debug)]
pub struct AuthGate {
    state: AuthState,
}

impl AuthGate {
    pub fn new() -> Self {
        Self {
            state: AuthState::Resolving,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Resolving)
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::SignedIn(session) if !session.is_expired() => Some(session),
            _ => None,
        }
    }

    pub fn require_session(&self) -> Result<&Session, AuthError> {
        self.session().ok_or(AuthError::NoSession)
    }

    /// Record the outcome of a sign-in attempt
    pub fn resolve(&mut self, outcome: Result<Session, AuthError>) -> Result<&Session, AuthError> {
        match outcome {
            Ok(session) => {
                info!("Signed in as {}", session.email.as_deref().unwrap_or(&session.user_id));
                self.state = AuthState::SignedIn(session);
                self.require_session()
            }
            Err(err) => {
                warn!("Sign-in failed: {}", err);
                self.state = AuthState::SignedOut;
                Err(err)
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.state = AuthState::SignedOut;
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

/// GoTrue error bodies differ between versions
#[derive(Deserialize, Default)]
struct AuthErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Password sign-in against the Supabase auth endpoint
pub struct AuthClient {
    client: Client,
    token_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("villa-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            token_url: format!("{}/auth/v1/token?grant_type=password", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(&body, status.as_u16()));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user_id: token.user.id,
            email: token.user.email,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}

fn classify_failure(body: &str, status: u16) -> AuthError {
    let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| format!("sign-in failed with status {}", status));

    if message.contains(INVALID_CREDENTIALS) {
        AuthError::InvalidCredentials
    } else {
        AuthError::Rejected(message)
    }
}
