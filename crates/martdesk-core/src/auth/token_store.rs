use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token file name in the data directory
const TOKEN_FILE: &str = "token.json";

/// Durable home of the bearer token.
///
/// The gateway reads it before every request and the session store writes it
/// on login/logout/check-auth. Implementations must be cheap to call; none of
/// these methods are invoked while an await is pending on the same store.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    /// Removing an absent token is not an error.
    fn remove(&self) -> Result<()>;
}

/// Process-local store, used by tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as JSON in the data directory.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn load(&self) -> Result<Option<PersistedToken>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let persisted: PersistedToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        debug!(saved_at = %persisted.saved_at, "Loaded persisted token");
        Ok(Some(persisted))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|p| p.token).filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("Failed to create token directory")?;
        let persisted = PersistedToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let path = self.token_path();
        let contents = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to restrict token file permissions")?;
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to delete token file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(store.get().unwrap(), None);

        store.set("jwt-123").unwrap();
        let reopened = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(reopened.get().unwrap().as_deref(), Some("jwt-123"));

        reopened.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // idempotent
        store.remove().unwrap();
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TOKEN_FILE), "not json").unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert!(store.get().is_err());
    }
}
