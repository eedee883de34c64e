//! Product image uploads.
//!
//! Images are written to the shared uploads directory under a random name
//! and served by both binaries at `/uploads/<name>`.

use std::path::{Path, PathBuf};

use rand::RngCore;
use thiserror::Error;

use chowline_core::image::UPLOADS_PREFIX;

/// Random bytes in a generated file name.
const NAME_BYTES: usize = 16;

/// Upload errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no image field in upload")]
    MissingFile,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("malformed upload: {0}")]
    Multipart(String),
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    /// Match a declared content type.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Whether `bytes` start with this format's signature.
    #[must_use]
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Webp => bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP"),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        }
    }

    /// File extension for stored images.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}

/// Writes validated images to the uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    #[must_use]
    pub const fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    /// Directory images are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted image in bytes.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate and store an image, returning its public path
    /// (`/uploads/<name>`).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooLarge` above the size cap,
    /// `UploadError::UnsupportedType` for anything but jpeg/png/webp/gif or
    /// when the content does not match the declared type, and
    /// `UploadError::Io` if the file cannot be written.
    pub async fn save(&self, content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let format = ImageFormat::from_content_type(content_type)
            .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;
        if !format.matches(bytes) {
            return Err(UploadError::UnsupportedType(format!(
                "{content_type} (content does not match)"
            )));
        }

        let name = format!("{}.{}", random_name(), format.extension());
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        tracing::info!(file = %name, size = bytes.len(), "image uploaded");
        Ok(format!("{UPLOADS_PREFIX}{name}"))
    }
}

fn random_name() -> String {
    let mut bytes = [0u8; NAME_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_content_types() {
        assert_eq!(
            ImageFormat::from_content_type("image/JPEG"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_content_type("image/webp; charset=binary"),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::from_content_type("image/svg+xml"), None);
        assert_eq!(ImageFormat::from_content_type("text/html"), None);
    }

    #[test]
    fn test_signatures() {
        assert!(ImageFormat::Png.matches(PNG));
        assert!(ImageFormat::Gif.matches(b"GIF89a...."));
        assert!(ImageFormat::Webp.matches(b"RIFF\0\0\0\0WEBPVP8 "));
        assert!(!ImageFormat::Webp.matches(b"RIFF\0\0\0\0WAVE"));
        assert!(!ImageFormat::Jpeg.matches(PNG));
    }

    #[tokio::test]
    async fn test_save_writes_random_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf(), 1024);

        let url = store.save("image/png", PNG).await.unwrap();
        let name = url.strip_prefix("/uploads/").unwrap();
        assert_eq!(name.len(), NAME_BYTES * 2 + ".png".len());
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), PNG);

        let other = store.save("image/png", PNG).await.unwrap();
        assert_ne!(url, other);
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_and_mislabeled() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf(), 8);

        assert!(matches!(
            store.save("image/png", PNG).await,
            Err(UploadError::TooLarge { limit: 8 })
        ));

        let store = UploadStore::new(dir.path().to_path_buf(), 1024);
        assert!(matches!(
            store.save("image/jpeg", PNG).await,
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            store.save("application/pdf", b"%PDF-1.7").await,
            Err(UploadError::UnsupportedType(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
