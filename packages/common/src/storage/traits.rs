use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::key::{ImageFormat, ImageKey};

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Content-addressed image storage.
///
/// Storing the same bytes twice yields the same key and a single file.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store bytes and return their key.
    async fn put(&self, data: &[u8], format: ImageFormat) -> Result<ImageKey, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(reader, format, u64::MAX).await
    }

    /// Store data from an async reader, failing once more than `limit` bytes
    /// have been read.
    async fn put_stream(
        &self,
        reader: BoxReader,
        format: ImageFormat,
        limit: u64,
    ) -> Result<ImageKey, StorageError>;

    /// Read all bytes of a stored image.
    async fn get(&self, key: &ImageKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Open a stored image for streaming.
    async fn open(&self, key: &ImageKey) -> Result<BoxReader, StorageError>;

    /// Size of a stored image in bytes.
    async fn size(&self, key: &ImageKey) -> Result<u64, StorageError>;

    /// Remove an image. Returns `false` if it did not exist.
    async fn delete(&self, key: &ImageKey) -> Result<bool, StorageError>;
}
