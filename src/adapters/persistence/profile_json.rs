//! Implements ProfileStorePort using a JSON file.
//!
//! Remembers the last-used business profile so the form can be pre-filled.

use crate::domain::{BusinessProfile, DomainError, StoredProfile};
use crate::ports::ProfileStorePort;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// JSON file-based profile storage.
pub struct ProfileJson {
    path: PathBuf,
}

impl ProfileJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ProfileStorePort for ProfileJson {
    async fn load(&self) -> Result<Option<BusinessProfile>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Profile(format!("read profile: {}", e))),
        };
        // Corrupt file: start with an empty form.
        match serde_json::from_str::<StoredProfile>(&raw) {
            Ok(stored) => {
                debug!(path = %self.path.display(), saved_at = %stored.saved_at, "profile loaded");
                Ok(Some(stored.profile))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt profile file");
                Ok(None)
            }
        }
    }

    /// Atomic save: write temp file, sync, rename over the target.
    async fn save(&self, profile: &BusinessProfile) -> Result<(), DomainError> {
        let stored = StoredProfile {
            profile: profile.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| DomainError::Profile(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Profile(format!("create profile dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Profile(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Profile(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Profile(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Profile(format!("atomic rename failed: {}", e)))?;

        debug!(path = %self.path.display(), "profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            destination_link: "https://maps.app.goo.gl/abc".into(),
            business_name: "The Corner Cafe".into(),
            product_or_service: "Iced Latte".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileJson::new(dir.path().join("profile.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileJson::new(dir.path().join("nested").join("profile.json"));
        store.save(&profile()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(profile()));
        assert!(!dir.path().join("nested").join("profile.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(ProfileJson::new(&path).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        ProfileJson::new(&path).save(&profile()).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["profile"]["businessName"], "The Corner Cafe");
        assert!(raw["saved_at"].is_string());
    }
}
