//! A single JSON document on disk.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, warn};

use ledgerdesk_core::error::{AppError, ErrorKind};
use ledgerdesk_core::result::AppResult;

/// Typed access to one JSON file.
///
/// A missing file reads as `T::default()`. Writes never leave a partially
/// written file behind: the content goes to `<file>.tmp` first and is then
/// renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a handle for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    pub async fn read(&self) -> AppResult<T> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Data file missing, using empty document");
                return Ok(T::default());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", self.path.display()),
                    e,
                ));
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed JSON in {}: {e}", self.path.display()),
                e,
            )
        })
    }

    /// Serialize and atomically replace the document.
    pub async fn write(&self, value: &T) -> AppResult<()> {
        self.stage(value).await?.commit().await
    }

    /// Write the serialized document to its temporary sibling.
    ///
    /// The target is untouched until the returned [`StagedFile`] is
    /// committed. A failed write removes whatever part of the temporary
    /// file was created.
    pub async fn stage(&self, value: &T) -> AppResult<StagedFile> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create data directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let data = serde_json::to_vec_pretty(value)?;
        let staged = StagedFile {
            tmp: self.tmp_path(),
            target: self.path.clone(),
        };

        if let Err(e) = fs::write(&staged.tmp, &data).await {
            staged.discard().await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", staged.tmp.display()),
                e,
            ));
        }

        debug!(path = %staged.tmp.display(), bytes = data.len(), "Staged data file");
        Ok(staged)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// A fully written temporary file waiting to replace its target.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Rename the temporary file over the target.
    pub async fn commit(self) -> AppResult<()> {
        fs::rename(&self.tmp, &self.target).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace {}", self.target.display()),
                e,
            )
        })?;
        debug!(path = %self.target.display(), "Replaced data file");
        Ok(())
    }

    /// Remove the temporary file, leaving the target as it was.
    pub async fn discard(&self) {
        if let Err(e) = fs::remove_file(&self.tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.tmp.display(), error = %e, "Failed to remove staged data file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_missing_file_reads_default() {
        let dir = tempfile::tempdir().unwrap();
        let doc: JsonDocument<BTreeMap<String, u32>> = JsonDocument::new(dir.path().join("x.json"));
        assert!(doc.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let doc: JsonDocument<BTreeMap<String, u32>> = JsonDocument::new(&path);

        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1);
        doc.write(&value).await.unwrap();

        assert_eq!(doc.read().await.unwrap(), value);
        assert!(!dir.path().join("nested").join("doc.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let doc: JsonDocument<BTreeMap<String, u32>> = JsonDocument::new(&path);
        let err = doc.read().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_discarded_stage_leaves_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc: JsonDocument<BTreeMap<String, u32>> = JsonDocument::new(&path);
        doc.write(&BTreeMap::from([("a".to_string(), 1)])).await.unwrap();

        let staged = doc
            .stage(&BTreeMap::from([("a".to_string(), 2)]))
            .await
            .unwrap();
        staged.discard().await;

        assert_eq!(doc.read().await.unwrap()["a"], 1);
        assert!(!dir.path().join("doc.json.tmp").exists());
    }
}
