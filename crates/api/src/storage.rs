//! Local file storage for uploaded documents and media.
//!
//! Files live under a root directory (`STORAGE_DIR`) and are addressed by a
//! relative path such as `documents/12/3f2a...e1.pdf`. The router serves the
//! root at `/storage`, so a file's public URL is
//! `{PUBLIC_URL}/storage/{relative_path}`.

use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The relative path escapes the storage root or is absolute.
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
}

pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: PathBuf, public_url: &str) -> Self {
        Self {
            root,
            base_url: format!("{}/storage", public_url.trim_end_matches('/')),
        }
    }

    /// Write `bytes` under `dir` with a generated name, returning the
    /// relative path to store in the database.
    pub async fn put(&self, dir: &str, extension: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let relative = format!("{}/{}.{extension}", dir.trim_matches('/'), Uuid::new_v4().simple());
        let path = self.resolve(&relative)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %relative, size = bytes.len(), "Stored file");
        Ok(relative)
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(relative)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal used after the owning row is gone.
    pub async fn delete_quietly(&self, relative: &str) {
        if let Err(e) = self.delete(relative).await {
            tracing::warn!(error = %e, path = relative, "Failed to remove stored file");
        }
    }

    pub fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url, relative.trim_start_matches('/'))
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(relative);
        let safe = !relative.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().to_path_buf(), "http://localhost:8000/")
    }

    #[tokio::test]
    async fn put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let rel = storage.put("documents/7", "pdf", b"%PDF-1.4").await.unwrap();
        assert!(rel.starts_with("documents/7/"));
        assert!(rel.ends_with(".pdf"));
        assert_eq!(storage.read(&rel).await.unwrap(), b"%PDF-1.4");

        storage.delete(&rel).await.unwrap();
        assert_matches!(storage.read(&rel).await, Err(StorageError::Io(_)));
        // Deleting twice is fine.
        storage.delete(&rel).await.unwrap();
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        assert_matches!(
            storage.read("../etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        );
        assert_matches!(storage.read("/etc/passwd").await, Err(StorageError::InvalidPath(_)));
        assert_matches!(storage.read("").await, Err(StorageError::InvalidPath(_)));
    }

    #[test]
    fn url_joins_base_and_path() {
        let storage = LocalStorage::new(PathBuf::from("storage/public"), "https://khayroukum.ml");
        assert_eq!(
            storage.url("media/a.png"),
            "https://khayroukum.ml/storage/media/a.png"
        );
    }
}
