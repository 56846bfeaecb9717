//! On-disk storage for petition and user images.
//!
//! Files are named after their owner and format, e.g. `petition_12.png` or
//! `user_3.jpg`. The datastore only records the filename.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::RestError;

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Parses a `Content-Type` header value. Parameters are ignored.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let parsed: mime::Mime = value.parse().ok()?;
        if parsed.type_() != mime::IMAGE {
            return None;
        }
        match parsed.subtype().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Guesses the format from a stored filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// The `Content-Type` to serve this format with.
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
        }
    }
}

/// Whose image a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Petition(i64),
    User(i64),
}

impl ImageOwner {
    /// The filename for this owner's image in the given format.
    pub fn filename(&self, format: ImageFormat) -> String {
        match self {
            ImageOwner::Petition(id) => format!("petition_{}.{}", id, format.extension()),
            ImageOwner::User(id) => format!("user_{}.{}", id, format.extension()),
        }
    }
}

/// A directory of uploaded images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the image directory if needed.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Writes an image and returns its filename.
    ///
    /// `previous` is the filename currently recorded for the owner; it is
    /// removed when the new image has a different name.
    pub async fn save(
        &self,
        owner: ImageOwner,
        format: ImageFormat,
        bytes: &[u8],
        previous: Option<&str>,
    ) -> Result<String, RestError> {
        let filename = owner.filename(format);
        self.ensure_dir().await.map_err(io_error)?;
        tokio::fs::write(self.root.join(&filename), bytes)
            .await
            .map_err(io_error)?;

        if let Some(previous) = previous.filter(|p| *p != filename) {
            self.remove(previous).await?;
        }

        debug!(filename = %filename, size = bytes.len(), "Stored image");
        Ok(filename)
    }

    /// Reads an image. Returns `None` if the file is missing.
    pub async fn load(&self, filename: &str) -> Result<Option<(Vec<u8>, ImageFormat)>, RestError> {
        let Some(format) = ImageFormat::from_filename(filename) else {
            warn!(filename = %filename, "Stored image has an unknown extension");
            return Ok(None);
        };

        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(Some((bytes, format))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    /// Deletes an image. A missing file is not an error.
    pub async fn remove(&self, filename: &str) -> Result<(), RestError> {
        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

fn io_error(err: io::Error) -> RestError {
    warn!(error = %err, "Image storage failure");
    RestError::internal("Internal Server Error")
}
