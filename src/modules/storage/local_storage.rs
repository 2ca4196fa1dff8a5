//! Attachment storage on the local filesystem

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use super::AttachmentStorage;
use crate::core::error::AppError;

/// Stores each object as a file at `root/<key>`
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create the storage, making sure the root directory exists
    pub async fn new(root: PathBuf) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create media root '{}': {}",
                root.display(),
                e
            ))
        })?;

        info!("Local attachment storage at {}", root.display());
        Ok(Self { root })
    }

    /// Resolve a key to a path inside the root, rejecting anything that could escape it
    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(AppError::Storage(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AttachmentStorage for LocalStorage {
    async fn store(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create directory for '{}': {}", key, e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file '{}': {}", key, e)))?;

        debug!("Stored file '{}'", key);
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(key)?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound("Attachment not found".to_string()),
            _ => AppError::Storage(format!("Failed to read file '{}': {}", key, e)),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted file '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete file '{}': {}",
                key, e
            ))),
        }
    }
}
