//! Blob storage behind a narrow upload interface.
//!
//! The production adapter writes under a local static root served by the API
//! process; an S3-style backend can replace it without touching the
//! provisioners. Keys are generated by the provisioners from validated
//! identifiers, never from raw user input.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("upload timed out")]
    Timeout,
}

/// Object storage collaborator used by the provisioners.
///
/// `upload` persists the artifact under `key` and returns a publicly
/// resolvable URL for it.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Filesystem-backed blob store.
///
/// Artifacts land under `root` and resolve as `{public_base}/{key}`; the API
/// process serves `root` over HTTP.
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    /// Create the store, ensuring the root directory exists.
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Upload(e.to_string()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        Ok(format!("{}/{}", self.public_base, key))
    }
}

/// In-memory blob store for dev mode and tests.
pub struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    public_base: String,
}

impl InMemoryBlobStore {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Bytes stored under `key`, if any (test inspection).
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().map(|o| o.is_empty()).unwrap_or(true)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError::Upload("lock poisoned".to_string()))?;
        objects.insert(key.to_string(), bytes);
        Ok(format!("{}/{}", self.public_base, key))
    }
}
