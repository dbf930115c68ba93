//! Google OAuth code exchange and refresh.
//!
//! Implements the authorization-code flow against the endpoints named in the
//! credentials file: building the consent URL, exchanging the pasted code for
//! tokens, and refreshing an expired access token. Requests are
//! form-encoded, as the Google token endpoint requires.

use serde::{Deserialize, Serialize};

use crate::credentials::ClientCredentials;
use crate::errors::AuthError;

/// OAuth scope granting read/write calendar access.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Refresh this long before nominal expiry (5 minutes).
pub const TOKEN_EXPIRY_BUFFER_MS: i64 = 300_000;

/// A bearer token pair with its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthTokens {
    /// Short-lived bearer token sent on API calls.
    pub access_token: String,
    /// Long-lived token used to mint new access tokens.
    pub refresh_token: String,
    /// Expiry instant in Unix milliseconds.
    pub expires_at: i64,
}

impl OAuthTokens {
    /// Whether the access token is stale enough to refresh.
    pub fn needs_refresh(&self, now_ms: i64) -> bool {
        now_ms + TOKEN_EXPIRY_BUFFER_MS >= self.expires_at
    }
}

/// Current Unix time in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert a token endpoint's relative `expires_in` (seconds) to an absolute
/// expiry in Unix milliseconds.
pub fn calculate_expires_at(expires_in_secs: i64) -> i64 {
    now_ms() + expires_in_secs * 1000
}

/// Build the consent URL for the browser step of the first-run flow.
///
/// Requests offline access so a refresh token is issued.
pub fn authorize_url(credentials: &ClientCredentials) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&prompt=consent",
        credentials.auth_uri,
        urlencoded(&credentials.client_id),
        urlencoded(credentials.redirect_uri()),
        urlencoded(CALENDAR_SCOPE),
    )
}

/// Exchange an authorization code for tokens.
#[tracing::instrument(skip_all)]
pub async fn exchange_code(
    client: &reqwest::Client,
    credentials: &ClientCredentials,
    code: &str,
) -> Result<OAuthTokens, AuthError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("redirect_uri", credentials.redirect_uri()),
        ("code", code),
    ];
    let data = post_token_request(client, &credentials.token_uri, &params).await?;
    let refresh_token = data.refresh_token.ok_or_else(|| AuthError::OAuth {
        status: 200,
        message: "token response carried no refresh_token".to_string(),
    })?;
    Ok(OAuthTokens {
        access_token: data.access_token,
        refresh_token,
        expires_at: calculate_expires_at(data.expires_in),
    })
}

/// Refresh an expired access token.
///
/// Google omits `refresh_token` from refresh responses; the existing one is
/// carried forward.
#[tracing::instrument(skip_all)]
pub async fn refresh(
    client: &reqwest::Client,
    credentials: &ClientCredentials,
    tokens: &OAuthTokens,
) -> Result<OAuthTokens, AuthError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("refresh_token", tokens.refresh_token.as_str()),
    ];
    let data = post_token_request(client, &credentials.token_uri, &params).await?;
    Ok(OAuthTokens {
        access_token: data.access_token,
        refresh_token: data
            .refresh_token
            .unwrap_or_else(|| tokens.refresh_token.clone()),
        expires_at: calculate_expires_at(data.expires_in),
    })
}

/// Token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

async fn post_token_request(
    client: &reqwest::Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let resp = client.post(token_uri).form(params).send().await?;

    let status = resp.status().as_u16();
    if status != 200 {
        let text = resp.text().await.unwrap_or_default();
        return Err(AuthError::OAuth {
            status,
            message: text,
        });
    }

    Ok(resp.json().await?)
}

/// Simple URL encoding for query parameters.
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25")
        .replace(' ', "%20")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace(':', "%3A")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
