//! Catalog persistence
//!
//! One JSON file holds the whole catalog. Loading a missing file yields an
//! empty catalog without touching the disk. Saving replaces the file through
//! a temporary sibling and a rename. Backups are a separate, explicit step
//! taken by the fetch workflow before it overwrites the catalog.

use super::Catalog;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the catalog path for the pre-write backup copy
pub const BACKUP_SUFFIX: &str = ".backup";

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/videos.json";

/// File-backed catalog store
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Catalog file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup copy (`<path>.backup`)
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Load the catalog
    ///
    /// A missing file is the normal "not fetched yet" state and yields an
    /// empty catalog. A file that is not a valid catalog document is
    /// reported as `Error::DataCorruption`.
    pub fn load(&self) -> Result<Catalog> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No catalog file yet");
                return Ok(Catalog::empty());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| Error::DataCorruption {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            videos = catalog.videos.len(),
            "Loaded catalog"
        );

        Ok(catalog)
    }

    /// Copy the current catalog file to `<path>.backup`
    ///
    /// Overwrites any earlier backup. Does nothing when no catalog exists.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let backup_path = self.backup_path();
        fs::copy(&self.path, &backup_path).map_err(|source| Error::Storage {
            path: backup_path.clone(),
            source,
        })?;

        info!("Created backup: {}", backup_path.display());
        Ok(Some(backup_path))
    }

    /// Write the whole catalog, replacing any existing file
    ///
    /// Stamps `last_updated` with the current UTC instant and refreshes
    /// `total_videos` on `catalog` before serializing.
    pub fn save(&self, catalog: &mut Catalog) -> Result<()> {
        self.save_at(catalog, crate::time::now())
    }

    /// `save` with an explicit timestamp
    pub fn save_at(&self, catalog: &mut Catalog, instant: chrono::DateTime<chrono::Utc>) -> Result<()> {
        catalog.channel_info.last_updated = Some(crate::time::to_catalog_timestamp(instant));
        catalog.channel_info.total_videos = catalog.videos.len();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| Error::Storage {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut json = serde_json::to_string_pretty(catalog)
            .map_err(|e| Error::InvalidInput(format!("Catalog serialization failed: {}", e)))?;
        json.push('\n');

        // Write to a sibling, then rename over the target
        let mut temp_name = self.path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, json).map_err(|source| Error::Storage {
            path: temp_path.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Storage {
                path: self.path.clone(),
                source,
            });
        }

        debug!(
            path = %self.path.display(),
            videos = catalog.videos.len(),
            "Saved catalog"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_appends_suffix() {
        let store = CatalogStore::new("data/videos.json");
        assert_eq!(store.backup_path(), PathBuf::from("data/videos.json.backup"));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("videos.json"));

        store.save(&mut Catalog::empty()).unwrap();

        assert!(store.path().exists());
        assert!(!dir.path().join("videos.json.tmp").exists());
    }

    #[test]
    fn test_backup_without_catalog_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("videos.json"));

        assert!(store.backup().unwrap().is_none());
        assert!(!store.backup_path().exists());
    }
}
