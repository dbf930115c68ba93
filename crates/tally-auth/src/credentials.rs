//! OAuth client credentials file.
//!
//! Reads the Google Cloud "installed application" credentials JSON
//! (`credentials.json` as downloaded from the console). Both the `installed`
//! and `web` wrapper keys are accepted.

use std::path::Path;

use serde::Deserialize;

use crate::errors::AuthError;

/// Out-of-band redirect used when the credentials file lists none.
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// OAuth client identity and endpoints for one registered application.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientCredentials {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Authorization endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Registered redirect URIs; the first is used for the console flow.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Wrapper object as written by the Google Cloud console.
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientCredentials>,
    web: Option<ClientCredentials>,
}

impl ClientCredentials {
    /// Load credentials from a console-format JSON file.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let data = std::fs::read_to_string(path)?;
        let file: CredentialsFile = serde_json::from_str(&data)?;
        file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidCredentials(
                "expected an \"installed\" or \"web\" client section".to_string(),
            )
        })
    }

    /// The redirect URI for the console code flow.
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map_or(OOB_REDIRECT, String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_installed_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            r#"{"installed": {
                "client_id": "abc.apps.googleusercontent.com",
                "client_secret": "shh",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]
            }}"#,
        );

        let creds = ClientCredentials::load(&path).unwrap();
        assert_eq!(creds.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(creds.redirect_uri(), "http://localhost");
    }

    #[test]
    fn loads_web_section_when_no_installed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            r#"{"web": {"client_id": "id", "client_secret": "secret"}}"#,
        );

        let creds = ClientCredentials::load(&path).unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn missing_sections_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"{"something_else": {}}"#);
        assert!(matches!(
            ClientCredentials::load(&path),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            ClientCredentials::load(&path),
            Err(AuthError::Io(_))
        ));
    }

    #[test]
    fn no_redirects_falls_back_to_oob() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
        );
        let creds = ClientCredentials::load(&path).unwrap();
        assert_eq!(creds.redirect_uri(), "urn:ietf:wg:oauth:2.0:oob");
    }
}
