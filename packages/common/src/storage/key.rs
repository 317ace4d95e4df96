use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::StorageError;

/// Image formats accepted for artwork and CMS uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    pub const ALL: &'static [ImageFormat] = &[Self::Jpeg, Self::Png, Self::Webp, Self::Gif];

    /// Match a declared MIME type (`image/jpg` is accepted as an alias).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Match a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detect the format of an upload, trusting the declared content type
    /// first and falling back to the file name's extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| {
                file_name
                    .and_then(|n| Path::new(n).extension())
                    .and_then(|e| e.to_str())
                    .and_then(Self::from_extension)
            })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

/// Content address of a stored image: SHA-256 of the bytes plus its format.
///
/// Rendered as the file name `<64 hex chars>.<ext>`, which is also the last
/// segment of the image's public URL.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageKey {
    hash: [u8; 32],
    format: ImageFormat,
}

impl ImageKey {
    pub fn compute(data: &[u8], format: ImageFormat) -> Self {
        Self {
            hash: Sha256::digest(data).into(),
            format,
        }
    }

    pub fn from_digest(hash: [u8; 32], format: ImageFormat) -> Self {
        Self { hash, format }
    }

    /// Parse a `<hex>.<ext>` file name.
    pub fn parse(file_name: &str) -> Result<Self, StorageError> {
        let (hex_part, ext) = file_name
            .split_once('.')
            .ok_or_else(|| StorageError::InvalidKey("missing extension".into()))?;
        let format = ImageFormat::from_extension(ext)
            .ok_or_else(|| StorageError::InvalidKey(format!("unsupported extension '{ext}'")))?;
        if hex_part.len() != 64 {
            return Err(StorageError::InvalidKey(format!(
                "expected 64 hex characters, got {}",
                hex_part.len()
            )));
        }
        let bytes = hex::decode(hex_part)
            .map_err(|e| StorageError::InvalidKey(format!("invalid hex: {e}")))?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidKey("decoded to wrong length".into()))?;
        Ok(Self { hash, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Canonical file name; `jpeg` input is normalised to `jpg`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.hex(), self.format.extension())
    }
}

impl fmt::Debug for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageKey({})", self.file_name())
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
