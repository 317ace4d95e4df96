//! Streaming image uploads from multipart fields into the image store.

use axum::extract::multipart::Field;
use common::storage::{BoxReader, ImageFormat, ImageKey, ImageStore};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;

/// What an upload endpoint accepts.
#[derive(Debug, Clone, Copy)]
pub struct ImagePolicy {
    pub max_size: u64,
    pub formats: &'static [ImageFormat],
}

/// Formats accepted for CMS images.
pub const CMS_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Webp];

impl ImagePolicy {
    pub fn submission(max_size: u64) -> Self {
        Self {
            max_size,
            formats: ImageFormat::ALL,
        }
    }

    pub fn cms(max_size: u64) -> Self {
        Self {
            max_size,
            formats: CMS_FORMATS,
        }
    }

    /// Resolve the format from the declared content type or file extension.
    pub fn accept(
        &self,
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<ImageFormat, AppError> {
        match ImageFormat::detect(content_type, file_name) {
            Some(format) if self.formats.contains(&format) => Ok(format),
            _ => {
                let allowed: Vec<&str> = self.formats.iter().map(|f| f.extension()).collect();
                Err(AppError::Validation(format!(
                    "Unsupported image type. Allowed: {}",
                    allowed.join(", ")
                )))
            }
        }
    }
}

/// A stored image.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: ImageKey,
    pub size: u64,
}

/// Stream one multipart file field into `store`.
///
/// Returns `Ok(None)` for an empty part (a file input left blank). The field is
/// spooled to a temp file first so the size limit is enforced before anything
/// reaches the store.
pub async fn store_image_field(
    mut field: Field<'_>,
    store: &dyn ImageStore,
    policy: ImagePolicy,
) -> Result<Option<StoredImage>, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let temp_path = std::env::temp_dir().join(format!("waka-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > policy.max_size {
                return Err(AppError::Validation(format!(
                    "Image exceeds maximum size of {} bytes",
                    policy.max_size
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Storage(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Storage(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        if total_size == 0 {
            return Ok(None);
        }

        let format = policy.accept(content_type.as_deref(), file_name.as_deref())?;

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        let key = store.put_stream(reader, format, policy.max_size).await?;

        Ok(Some(StoredImage {
            key,
            size: total_size,
        }))
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}
