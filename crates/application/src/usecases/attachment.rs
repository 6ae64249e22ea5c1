//! Attachment handling: allow-list, filename sanitizing and storage.

use std::sync::Arc;

use domain::error::DomainError;
use domain::inquiry::FileInfo;
use domain::inquiry::ImageType;
use domain::inquiry::file::{check_saved_filename, sanitize_filename};
use uuid::Uuid;

use crate::dto::FileUploadDto;
use crate::error::{ApplicationError, Result};
use crate::ports::outbound::AttachmentStorage;

/// Turns uploads into stored [`FileInfo`] records.
pub struct AttachmentHandler {
    storage: Arc<dyn AttachmentStorage>,
}

impl AttachmentHandler {
    pub fn new(storage: Arc<dyn AttachmentStorage>) -> Self {
        Self { storage }
    }

    /// Check the declared content type against the image allow-list.
    pub fn validate(&self, upload: &FileUploadDto) -> Result<ImageType> {
        ImageType::from_mime(upload.content_type.as_deref()).map_err(|err| {
            match err {
                DomainError::UnsupportedContentType(mime) => {
                    ApplicationError::InvalidFileType(mime)
                },
                other => other.into(),
            }
        })
    }

    /// Reduce a client-supplied filename to its final path component.
    pub fn sanitize(&self, original: Option<&str>) -> Result<String> {
        let original = original.ok_or(ApplicationError::InvalidFilename)?;
        sanitize_filename(original).map_err(|_| ApplicationError::InvalidFilename)
    }

    /// Write a single upload under a fresh `<uuid>_<name>` filename.
    pub async fn store(&self, upload: &FileUploadDto) -> Result<FileInfo> {
        self.validate(upload)?;
        let original = self.sanitize(upload.filename.as_deref())?;
        self.write(original, &upload.bytes).await
    }

    /// Store every non-empty upload, or none of them.
    ///
    /// All uploads are checked before the first byte is written. When a
    /// write fails, files already written by this call are removed.
    pub async fn store_all(
        &self,
        uploads: &[FileUploadDto],
    ) -> Result<Vec<FileInfo>> {
        let mut accepted = Vec::with_capacity(uploads.len());
        for upload in uploads.iter().filter(|upload| !upload.is_empty()) {
            self.validate(upload)?;
            let original = self.sanitize(upload.filename.as_deref())?;
            accepted.push((original, upload));
        }

        let mut stored: Vec<FileInfo> = Vec::with_capacity(accepted.len());
        for (original, upload) in accepted {
            match self.write(original, &upload.bytes).await {
                Ok(info) => stored.push(info),
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        written = stored.len(),
                        "attachment write failed, rolling back"
                    );
                    for info in &stored {
                        self.remove(info).await;
                    }
                    return Err(err);
                },
            }
        }

        Ok(stored)
    }

    /// Read a stored attachment by its saved filename.
    pub async fn open(&self, saved_filename: &str) -> Result<Option<Vec<u8>>> {
        check_saved_filename(saved_filename)
            .map_err(|_| ApplicationError::InvalidFilename)?;

        self.storage.read(saved_filename).await
    }

    /// Delete a stored attachment, best-effort.
    pub async fn remove(&self, file: &FileInfo) {
        if let Err(err) = self.storage.delete(file.saved_filename()).await {
            tracing::warn!(
                error = %err,
                file = file.saved_filename(),
                "failed to remove attachment"
            );
        }
    }

    async fn write(&self, original: String, bytes: &[u8]) -> Result<FileInfo> {
        let saved = format!("{}_{}", Uuid::new_v4(), original);
        let path = self.storage.write(&saved, bytes).await?;

        Ok(FileInfo::new(original, saved, path))
    }
}
