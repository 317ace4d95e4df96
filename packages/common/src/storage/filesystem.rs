use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use super::error::StorageError;
use super::key::{ImageFormat, ImageKey};
use super::traits::{BoxReader, ImageStore};

/// Filesystem-backed image store.
///
/// Images live under `{base_path}/{first 2 hex chars}/{hex}.{ext}`. Writes
/// go to `{base_path}/.tmp` first and are renamed into place, so a reader
/// never observes a partially written image.
pub struct FilesystemImageStore {
    base_path: PathBuf,
}

impl FilesystemImageStore {
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    fn image_path(&self, key: &ImageKey) -> PathBuf {
        let hex = key.hex();
        self.base_path.join(&hex[..2]).join(key.file_name())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Move a fully written temp file to its final location.
    async fn commit(&self, temp_path: PathBuf, key: &ImageKey) -> Result<(), StorageError> {
        let path = self.image_path(key);
        if fs::try_exists(&path).await? {
            debug!(file = %key.file_name(), "Image already stored, dropping duplicate");
            let _ = fs::remove_file(&temp_path).await;
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put_stream(
        &self,
        mut reader: BoxReader,
        format: ImageFormat,
        limit: u64,
    ) -> Result<ImageKey, StorageError> {
        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut hasher = Sha256::new();
        let mut written: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    drop(temp_file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e.into());
                }
            };
            if n == 0 {
                break;
            }
            written += n as u64;
            if written > limit {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: written,
                    limit,
                });
            }
            hasher.update(&buf[..n]);
            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        drop(temp_file);

        let key = ImageKey::from_digest(hasher.finalize().into(), format);
        self.commit(temp_path, &key).await?;
        debug!(file = %key.file_name(), size = written, "Stored image");
        Ok(key)
    }

    async fn open(&self, key: &ImageKey) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.image_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.file_name()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, key: &ImageKey) -> Result<u64, StorageError> {
        match fs::metadata(self.image_path(key)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.file_name()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &ImageKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.image_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
