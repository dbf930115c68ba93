//! Token storage file I/O.
//!
//! Reads and writes `~/.tally/token.json` with secure file permissions
//! (0o600). Loads are tolerant — a missing, unreadable, or wrong-version
//! file reads as "not authenticated" — while saves surface their errors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AuthError;
use crate::google::OAuthTokens;

/// Default token file name.
const TOKEN_FILE_NAME: &str = "token.json";

/// On-disk token file layout.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    version: u32,
    tokens: OAuthTokens,
    last_updated: String,
}

/// Get the token file path under the given data directory.
pub fn token_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TOKEN_FILE_NAME)
}

/// Load stored tokens.
///
/// Returns `None` if the file doesn't exist or is invalid.
pub fn load_tokens(path: &Path) -> Option<OAuthTokens> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("failed to read token file: {e}");
            return None;
        }
    };

    match serde_json::from_str::<TokenFile>(&data) {
        Ok(file) if file.version == 1 => Some(file.tokens),
        Ok(file) => {
            tracing::warn!("unsupported token file version: {}", file.version);
            None
        }
        Err(e) => {
            tracing::warn!("failed to parse token file: {e}");
            None
        }
    }
}

/// Save tokens to file.
///
/// Creates parent directories if needed. Sets file permissions to 0o600.
pub fn save_tokens(path: &Path, tokens: &OAuthTokens) -> Result<(), AuthError> {
    let file = TokenFile {
        version: 1,
        tokens: tokens.clone(),
        last_updated: chrono::Utc::now().to_rfc3339(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, &json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }

    Ok(())
}

/// Delete the token file.
pub fn clear_tokens(path: &Path) -> Result<(), AuthError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::Io(e)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_path(dir: &TempDir) -> PathBuf {
        dir.path().join("token.json")
    }

    fn make_tokens() -> OAuthTokens {
        OAuthTokens {
            access_token: "ya29.tok".to_string(),
            refresh_token: "1//ref".to_string(),
            expires_at: 999_999,
        }
    }

    #[test]
    fn token_file_path_construction() {
        let p = token_file_path(Path::new("/home/user/.tally"));
        assert_eq!(p, PathBuf::from("/home/user/.tally/token.json"));
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_tokens(&test_path(&dir)).is_none());
    }

    #[test]
    fn load_invalid_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        std::fs::write(&path, "not json").unwrap();
        assert!(load_tokens(&path).is_none());
    }

    #[test]
    fn load_wrong_version_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        std::fs::write(
            &path,
            r#"{"version":2,"tokens":{"accessToken":"a","refreshToken":"r","expiresAt":1},"lastUpdated":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(load_tokens(&path).is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);

        save_tokens(&path, &make_tokens()).unwrap();

        let loaded = load_tokens(&path).unwrap();
        assert_eq!(loaded, make_tokens());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("token.json");
        save_tokens(&path, &make_tokens()).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn save_sets_permissions_0600() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_tokens(&path, &make_tokens()).unwrap();
        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn clear_tokens_deletes_file() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_tokens(&path, &make_tokens()).unwrap();
        assert!(path.exists());

        clear_tokens(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn clear_tokens_noop_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(clear_tokens(&test_path(&dir)).is_ok());
    }
}
