//! Storage for grievance attachments
//!
//! Objects are addressed by key. Two backends: a directory on local disk and
//! MinIO (or any S3-compatible service).

mod local_storage;
mod minio_client;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

pub use local_storage::LocalStorage;
pub use minio_client::MinIOClient;

/// Key/value object store for attachment bytes
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Write an object, replacing any existing one under the same key
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Read an object; a missing key is `NotFound`
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, AppError>;

    /// Remove an object; a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Build the backend selected by configuration
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn AttachmentStorage>, AppError> {
    match config {
        StorageConfig::Local { root } => Ok(Arc::new(LocalStorage::new(root.clone()).await?)),
        StorageConfig::MinIO(minio) => Ok(Arc::new(MinIOClient::new(minio.clone()).await?)),
    }
}
