//! Credential storage and retrieval.
//!
//! Stores the access/refresh pair in `<base>/credentials.json` with
//! restricted permissions (0600). Tokens are never logged or displayed in full.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::error::{IfoodError, Result};

/// Session token pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AccessToken", default)]
    pub access_token: String,
    #[serde(rename = "RefreshToken", default)]
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Both tokens are empty.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty() && self.refresh_token.is_empty()
    }
}

/// File-backed credential store. The file is overwritten wholesale on save.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(paths::credentials_path())
    }
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved pair.
    ///
    /// # Errors
    /// Returns [`IfoodError::NotFound`] when the file is missing, unreadable,
    /// unparsable, or holds no tokens.
    pub fn load(&self) -> Result<Credentials> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %err, "cannot read credentials");
                }
                return Err(IfoodError::NotFound(self.path.clone()));
            }
        };

        match serde_json::from_str::<Credentials>(&contents) {
            Ok(creds) if !creds.is_empty() => Ok(creds),
            Ok(_) => Err(IfoodError::NotFound(self.path.clone())),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "unparsable credentials");
                Err(IfoodError::NotFound(self.path.clone()))
            }
        }
    }

    /// Replaces the saved pair.
    ///
    /// Writes to a temp file next to the target and renames it into place.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let contents = serde_json::to_string_pretty(creds).map_err(io::Error::other)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".credentials")
            .suffix(".tmp")
            .tempfile_in(&parent)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Removes the saved pair. Returns whether a file existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let head: String = token.chars().take(12).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        let creds = Credentials::new("access-token", "refresh-token");

        store.save(&creds).unwrap();
        assert_eq!(store.load().unwrap(), creds);
    }

    #[test]
    fn test_file_uses_original_field_names() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        store.save(&Credentials::new("a", "r")).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\"AccessToken\": \"a\""));
        assert!(contents.contains("\"RefreshToken\": \"r\""));
    }

    #[test]
    fn test_save_overwrites_and_creates_parent() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join("credentials.json"));

        store.save(&Credentials::new("old", "old-r")).unwrap();
        store.save(&Credentials::new("new", "new-r")).unwrap();

        assert_eq!(store.load().unwrap(), Credentials::new("new", "new-r"));
        let leftovers: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        store.save(&Credentials::new("a", "r")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert!(matches!(store.load(), Err(IfoodError::NotFound(_))));
    }

    #[test]
    fn test_load_garbage_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let store = CredentialStore::new(path);
        assert!(matches!(store.load(), Err(IfoodError::NotFound(_))));
    }

    #[test]
    fn test_load_empty_tokens_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"AccessToken":"","RefreshToken":""}"#).unwrap();

        let store = CredentialStore::new(path);
        assert!(matches!(store.load(), Err(IfoodError::NotFound(_))));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert!(!store.clear().unwrap());

        store.save(&Credentials::new("a", "r")).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGciOiJI...");
        assert_eq!(mask_token("short"), "***");
    }
}
