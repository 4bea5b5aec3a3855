use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

/// Public path prefix of stored blobs.
pub const BLOB_URI_PREFIX: &str = "/uploads";

/// Binary object storage addressed by relative keys such as
/// `beers/12/1700000000_1a2b.png`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `content` under `key` and returns its public uri.
    async fn put(&self, key: &str, content: Vec<u8>) -> Result<String, AppError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Returns false when there was nothing to delete.
    async fn delete(&self, key: &str) -> Result<bool, AppError>;
}

pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(AppError::Internal(format!("invalid blob key '{}'", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
    async fn put(&self, key: &str, content: Vec<u8>) -> Result<String, AppError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;

        Ok(format!("{}/{}", BLOB_URI_PREFIX, key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (FileSystemBlobStore, PathBuf) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("test_blobs_{}", nanos));
        (FileSystemBlobStore::new(&root), root)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let (store, root) = temp_store();

        let uri = store.put("beers/1/label.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(uri, "/uploads/beers/1/label.png");
        assert!(root.join("beers/1/label.png").exists());

        assert_eq!(store.get("beers/1/label.png").await.unwrap(), Some(vec![1, 2, 3]));
        assert!(store.delete("beers/1/label.png").await.unwrap());
        assert!(!store.delete("beers/1/label.png").await.unwrap());
        assert_eq!(store.get("beers/1/label.png").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_keys_escaping_the_root() {
        let (store, _root) = temp_store();

        assert!(store.put("../outside.png", vec![1]).await.is_err());
        assert!(store.get("/etc/passwd").await.is_err());
        assert!(store.delete("").await.is_err());
    }
}
