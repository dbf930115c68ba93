//! Authenticated session handle.
//!
//! [`TokenProvider`] is the seam the calendar client authenticates through:
//! it yields a bearer token on demand and hides how that token is minted.
//! [`OAuthSession`] is the production implementation — stored tokens,
//! refreshed ahead of expiry and persisted back to disk.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::credentials::ClientCredentials;
use crate::errors::AuthError;
use crate::google::{self, OAuthTokens, now_ms};
use crate::storage;

/// Source of bearer tokens for API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A bearer token currently valid for the remote API.
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Stored-token session with automatic refresh.
///
/// Tokens live in the token file; the in-memory copy is only a cache. A
/// refresh that cannot be persisted is logged and served anyway — the next
/// process start will simply refresh again.
pub struct OAuthSession {
    credentials: ClientCredentials,
    token_path: PathBuf,
    http: reqwest::Client,
    cached: Mutex<Option<OAuthTokens>>,
}

impl OAuthSession {
    /// Create a session backed by the given credentials and token file.
    pub fn new(credentials: ClientCredentials, token_path: PathBuf) -> Self {
        Self {
            credentials,
            token_path,
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    fn current_tokens(&self) -> Result<OAuthTokens, AuthError> {
        if let Some(tokens) = self.cached.lock().clone() {
            return Ok(tokens);
        }
        storage::load_tokens(&self.token_path).ok_or_else(|| {
            AuthError::NotAuthenticated(format!(
                "no stored tokens at {} (run the login flow first)",
                self.token_path.display()
            ))
        })
    }
}

#[async_trait]
impl TokenProvider for OAuthSession {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        let tokens = self.current_tokens()?;

        if !tokens.needs_refresh(now_ms()) {
            *self.cached.lock() = Some(tokens.clone());
            return Ok(tokens.access_token);
        }

        tracing::info!("access token expired, refreshing");
        let fresh = google::refresh(&self.http, &self.credentials, &tokens).await?;
        if let Err(e) = storage::save_tokens(&self.token_path, &fresh) {
            tracing::warn!("failed to persist refreshed tokens: {e}");
        }
        let access_token = fresh.access_token.clone();
        *self.cached.lock() = Some(fresh);
        Ok(access_token)
    }
}

/// Fixed-token provider for tests and pre-minted tokens.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a pre-minted bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
