//! Local filesystem attachment storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use application::error::{ApplicationError, Result};
use application::ports::outbound::AttachmentStorage;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Stores attachments as plain files under one directory.
///
/// The directory is created on first write.
pub struct LocalAttachmentStorage {
    root: PathBuf,
}

impl LocalAttachmentStorage {
    /// Create a new [`LocalAttachmentStorage`] rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `name` inside the root, refusing anything but a single
    /// normal path component.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(ApplicationError::InvalidFilename),
        }
    }
}

#[async_trait]
impl AttachmentStorage for LocalAttachmentStorage {
    async fn write(&self, saved_filename: &str, bytes: &[u8]) -> Result<String> {
        let path = self.resolve(saved_filename)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ApplicationError::StorageFailure)?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(ApplicationError::StorageFailure)?;
        file.write_all(bytes)
            .await
            .map_err(ApplicationError::StorageFailure)?;
        file.flush().await.map_err(ApplicationError::StorageFailure)?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "attachment written");

        Ok(path.display().to_string())
    }

    async fn read(&self, saved_filename: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(saved_filename)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ApplicationError::StorageFailure(err)),
        }
    }

    async fn delete(&self, saved_filename: &str) -> Result<()> {
        let path = self.resolve(saved_filename)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApplicationError::StorageFailure(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::inquiry::file::{NAME_MAX, sanitize_filename};

    use super::*;

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path().join("uploads"));

        let path = storage.write("abc_img.png", b"png").await.unwrap();

        assert!(path.ends_with("abc_img.png"));
        assert_eq!(
            storage.read("abc_img.png").await.unwrap(),
            Some(b"png".to_vec())
        );
    }

    #[tokio::test]
    async fn test_write_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path());

        storage.write("a.png", b"first").await.unwrap();
        let err = storage.write("a.png", b"second").await.unwrap_err();

        assert!(matches!(err, ApplicationError::StorageFailure(_)));
        assert_eq!(storage.read("a.png").await.unwrap(), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_read_and_delete_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path());

        assert_eq!(storage.read("missing.png").await.unwrap(), None);
        assert!(storage.delete("missing.png").await.is_ok());

        storage.write("b.gif", b"gif").await.unwrap();
        storage.delete("b.gif").await.unwrap();
        assert_eq!(storage.read("b.gif").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_longest_saved_name_fits_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path());

        let original =
            sanitize_filename(&format!("{}.jpg", "고객문의".repeat(40))).unwrap();
        let saved = format!("0f8a3c5e-1b2d-4e6f-8a9b-0c1d2e3f4a5b_{original}");
        assert!(saved.len() <= NAME_MAX);

        storage.write(&saved, b"jpg").await.unwrap();
        assert_eq!(storage.read(&saved).await.unwrap(), Some(b"jpg".to_vec()));
    }

    #[tokio::test]
    async fn test_names_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path().join("uploads"));

        for name in ["../escape.png", "a/b.png", "/etc/passwd", "", ".."] {
            assert!(
                matches!(
                    storage.read(name).await,
                    Err(ApplicationError::InvalidFilename)
                ),
                "{name} should be rejected"
            );
        }
        assert!(storage.write("../escape.png", b"x").await.is_err());
        assert!(!dir.path().join("escape.png").exists());
    }
}
