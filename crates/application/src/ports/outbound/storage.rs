//! Attachment storage port.

use async_trait::async_trait;

use crate::error::Result;

/// Port for the raw bytes of attachments.
///
/// Names given to this port are already sanitized single path components.
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Write a new file and return its storage location.
    ///
    /// Never overwrites an existing file.
    async fn write(&self, saved_filename: &str, bytes: &[u8]) -> Result<String>;

    /// Read a stored file, `None` if it does not exist under the root.
    async fn read(&self, saved_filename: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a stored file. Missing files are not an error.
    async fn delete(&self, saved_filename: &str) -> Result<()>;
}
