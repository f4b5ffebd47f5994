use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use domlens_core::{Error, Paths, Result};

/// Storage key for the authenticated user id set by the login handshake.
pub const KEY_USER_ID: &str = "userId";
/// Storage key for the auth token read by `getAuthToken`.
pub const KEY_AUTH_TOKEN: &str = "authToken";

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CredentialFile {
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Small JSON file-backed key/value store for persisted credentials.
/// Reads of a missing file behave as an empty store; writes create the
/// file and its directory on demand.
pub struct CredentialStore {
    paths: Paths,
}

impl CredentialStore {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_file()?.entries.get(key).cloned())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut file = self.read_file()?;
        file.entries.insert(key.to_string(), value.to_string());
        self.write_file(file)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut file = self.read_file()?;
        if file.entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_file(file)
    }

    fn read_file(&self) -> Result<CredentialFile> {
        let path = self.paths.credentials_file();
        if !path.exists() {
            return Ok(CredentialFile::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read credential store: {}", e)))?;
        match serde_json::from_str(&content) {
            Ok(file) => Ok(file),
            Err(e) => {
                debug!(error = %e, "Credential store unreadable, treating as empty");
                Ok(CredentialFile::default())
            }
        }
    }

    fn write_file(&self, mut file: CredentialFile) -> Result<()> {
        let path = self.paths.credentials_file();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create store directory: {}", e)))?;
        }

        let now = chrono::Utc::now().to_rfc3339();
        if file.created_at.is_empty() {
            file.created_at = now.clone();
        }
        file.updated_at = now;

        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&path, content)
            .map_err(|e| Error::Storage(format!("Failed to write credential store: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_base(dir.path().to_path_buf());
        (dir, CredentialStore::new(paths))
    }

    #[test]
    fn test_empty_store_reads_none() {
        let (_dir, store) = store();
        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_set_get_remove_round_trip() {
        let (_dir, store) = store();
        store.set(KEY_USER_ID, "abc123").unwrap();
        assert_eq!(store.get(KEY_USER_ID).unwrap().as_deref(), Some("abc123"));

        store.remove(KEY_USER_ID).unwrap();
        assert_eq!(store.get(KEY_USER_ID).unwrap(), None);
    }

    #[test]
    fn test_entries_are_independent() {
        let (_dir, store) = store();
        store.set(KEY_USER_ID, "u1").unwrap();
        store.set(KEY_AUTH_TOKEN, "t1").unwrap();
        store.remove(KEY_USER_ID).unwrap();
        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("t1"));
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let (_dir, store) = store();
        store.remove("nothing").unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("credentials.json"), "{not json").unwrap();
        assert_eq!(store.get(KEY_USER_ID).unwrap(), None);
        // and the store recovers on the next write
        store.set(KEY_USER_ID, "fresh").unwrap();
        assert_eq!(store.get(KEY_USER_ID).unwrap().as_deref(), Some("fresh"));
    }
}
