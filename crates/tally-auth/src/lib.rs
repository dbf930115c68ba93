//! # tally-auth
//!
//! Google OAuth 2.0 authentication for the tally daemon.
//!
//! The daemon authenticates as an "installed application": client identity
//! comes from a console-downloaded `credentials.json`, user consent from a
//! one-time browser flow, and everything after that from a stored refresh
//! token.
//!
//! - [`credentials`]: the OAuth client file
//! - [`google`]: consent URL, code exchange, token refresh
//! - [`storage`]: `token.json` persistence (0o600, versioned)
//! - [`session`]: the [`TokenProvider`] seam and its refresh-through
//!   [`OAuthSession`] implementation

#![deny(unsafe_code)]

pub mod credentials;
pub mod errors;
pub mod google;
pub mod session;
pub mod storage;

pub use credentials::ClientCredentials;
pub use errors::AuthError;
pub use google::{CALENDAR_SCOPE, OAuthTokens, authorize_url, exchange_code, now_ms, refresh};
pub use session::{OAuthSession, StaticTokenProvider, TokenProvider};
pub use storage::{clear_tokens, load_tokens, save_tokens, token_file_path};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _provider = StaticTokenProvider::new("tok");
        let _path = token_file_path(std::path::Path::new("/tmp/.tally"));
        assert!(CALENDAR_SCOPE.contains("calendar"));
    }
}
