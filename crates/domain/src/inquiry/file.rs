//! Attachment metadata and upload rules.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Longest filename most filesystems accept, in bytes.
pub const NAME_MAX: usize = 255;
/// Bytes taken by the `<uuid>_` prefix of a saved filename.
pub const SAVED_PREFIX_LENGTH: usize = 37;
/// Longest sanitized original filename, in bytes.
pub const MAX_FILENAME_BYTES: usize = NAME_MAX - SAVED_PREFIX_LENGTH;
/// Extensions longer than this are kept as part of the stem.
const MAX_EXTENSION_BYTES: usize = 16;

/// Image types accepted as attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Gif,
    Jpeg,
    Png,
}

impl ImageType {
    /// Matches a MIME type against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `Err` for anything other than `image/gif`, `image/jpeg`
    /// or `image/png`, including a missing content type.
    pub fn from_mime(content_type: Option<&str>) -> Result<Self> {
        let mime = content_type.unwrap_or_default();
        // Parameters such as `; charset=` are not part of the type.
        let essence = mime.split(';').next().unwrap_or_default().trim();

        match essence.to_ascii_lowercase().as_str() {
            "image/gif" => Ok(Self::Gif),
            "image/jpeg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            _ => Err(DomainError::UnsupportedContentType(mime.to_owned())),
        }
    }

    /// Matches a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "gif" => Some(Self::Gif),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Reduce a client-supplied filename to a safe, single path component.
///
/// Backslashes count as separators. Any `..` component is rejected rather
/// than resolved. Names over [`MAX_FILENAME_BYTES`] lose the end of their
/// stem, keeping the extension.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let normalized = raw.replace('\\', "/");

    if normalized.split('/').any(|component| component.trim() == "..") {
        return Err(DomainError::InvalidFilename);
    }

    let name = normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name.chars().any(char::is_control) {
        return Err(DomainError::InvalidFilename);
    }

    Ok(truncate_name(name))
}

/// Checks that a saved filename is a single plain path component.
///
/// Unlike [`sanitize_filename`] this never rewrites the name, so a name the
/// store generated always passes.
pub fn check_saved_filename(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.len() > NAME_MAX
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control)
    {
        return Err(DomainError::InvalidFilename);
    }

    Ok(())
}

fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_FILENAME_BYTES {
        return name.to_owned();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && ext.len() <= MAX_EXTENSION_BYTES =>
        {
            (stem, Some(ext))
        },
        _ => (name, None),
    };

    let budget = MAX_FILENAME_BYTES - extension.map_or(0, |ext| ext.len() + 1);
    let stem = floor_char_boundary(stem, budget).trim_end();

    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_owned(),
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn floor_char_boundary(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Metadata for one persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    original_filename: String,
    saved_filename: String,
    file_path: String,
}

impl FileInfo {
    pub fn new(
        original_filename: impl Into<String>,
        saved_filename: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            saved_filename: saved_filename.into(),
            file_path: file_path.into(),
        }
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Collision-resistant name on disk, also used in download links.
    pub fn saved_filename(&self) -> &str {
        &self.saved_filename
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_allow_list() {
        assert_eq!(ImageType::from_mime(Some("image/png")).unwrap(), ImageType::Png);
        assert_eq!(ImageType::from_mime(Some("image/jpeg")).unwrap(), ImageType::Jpeg);
        assert_eq!(ImageType::from_mime(Some("IMAGE/GIF")).unwrap(), ImageType::Gif);
        assert!(ImageType::from_mime(Some("text/plain")).is_err());
        assert!(ImageType::from_mime(Some("image/svg+xml")).is_err());
        assert!(ImageType::from_mime(None).is_err());
    }

    #[test]
    fn test_sanitize_keeps_last_component() {
        assert_eq!(sanitize_filename("img.png").unwrap(), "img.png");
        assert_eq!(sanitize_filename("C:\\Users\\me\\photo.jpg").unwrap(), "photo.jpg");
        assert_eq!(sanitize_filename("dir/sub/a b.gif").unwrap(), "a b.gif");
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert!(matches!(
            sanitize_filename("../../etc/passwd"),
            Err(DomainError::InvalidFilename)
        ));
        assert!(sanitize_filename("..\\secret.png").is_err());
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("dir/").is_err());
        assert!(sanitize_filename("bad\nname.png").is_err());
    }

    #[test]
    fn test_sanitize_bounds_bytes_and_keeps_extension() {
        // 86 characters, 250 bytes.
        let korean = format!("{}.png", "사진".repeat(41));
        let name = sanitize_filename(&korean).unwrap();

        assert!(name.len() <= MAX_FILENAME_BYTES);
        assert!(name.ends_with(".png"));
        assert!(name.starts_with("사진"));
        assert!(SAVED_PREFIX_LENGTH + name.len() <= NAME_MAX);

        let long = format!("{}.jpeg", "a".repeat(400));
        let name = sanitize_filename(&long).unwrap();
        assert_eq!(name.len(), MAX_FILENAME_BYTES);
        assert!(name.ends_with("a.jpeg"));

        assert_eq!(sanitize_filename("short.gif").unwrap(), "short.gif");
    }

    #[test]
    fn test_check_saved_filename() {
        let saved = format!(
            "3f0c9a52-8d1e-4d7c-9a43-0a6c2b1d5e7f_{}",
            "a".repeat(MAX_FILENAME_BYTES)
        );
        assert!(check_saved_filename(&saved).is_ok());
        assert!(check_saved_filename("x_img.png").is_ok());

        for name in ["", ".", "..", "../x.png", "a/b.png", "a\\b.png", "a\nb"] {
            assert!(check_saved_filename(name).is_err(), "{name:?}");
        }
        assert!(check_saved_filename(&"a".repeat(NAME_MAX + 1)).is_err());
    }

    #[test]
    fn test_image_type_from_extension() {
        assert_eq!(ImageType::from_extension("JPG").map(|t| t.mime()), Some("image/jpeg"));
        assert_eq!(ImageType::from_extension("png"), Some(ImageType::Png));
        assert_eq!(ImageType::from_extension("txt"), None);
    }
}
