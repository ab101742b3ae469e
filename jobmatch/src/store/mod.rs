//! Storage collaborators and the CV library built on them.
//!
//! Storage is an external key/value service with a finite capacity; the
//! library only talks to it through [`KeyValueStore`]. File bytes arrive
//! through a [`ByteSource`].

mod library;

pub use library::{CvLibrary, CvStatistics, StoredCv};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{JobmatchError, StoreError};

/// Async key/value storage over JSON values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store with a byte capacity, measured on serialized values.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, (Value, usize)>>,
    capacity: usize,
}

impl MemoryStore {
    /// Creates a store holding at most `capacity` serialized bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Serialized bytes currently held.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.read().values().map(|(_, size)| size).sum()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let size = serde_json::to_vec(&value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?
            .len();

        let mut entries = self.entries.write();
        let others: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, (_, size))| size)
            .sum();
        let required = others + size;
        if required > self.capacity {
            return Err(StoreError::QuotaExceeded {
                required,
                capacity: self.capacity,
            });
        }
        entries.insert(key.to_string(), (value, size));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// A file to upload: its declared attributes and a way to read its bytes.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// File name.
    fn name(&self) -> &str;

    /// MIME type.
    fn mime_type(&self) -> &str;

    /// Size the source claims to have.
    fn declared_len(&self) -> usize;

    /// Reads the bytes.
    async fn read(&self) -> Result<Vec<u8>, JobmatchError>;
}

/// A file on disk.
#[derive(Debug, Clone)]
pub struct FileByteSource {
    path: PathBuf,
    name: String,
    mime_type: String,
    declared_len: usize,
}

impl FileByteSource {
    /// Opens `path`, taking its declared length from file metadata.
    ///
    /// # Errors
    ///
    /// Returns [`JobmatchError::Io`] when the file cannot be inspected.
    pub async fn open(
        path: impl AsRef<Path>,
        mime_type: impl Into<String>,
    ) -> Result<Self, JobmatchError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            declared_len: usize::try_from(metadata.len()).unwrap_or(usize::MAX),
            path,
            name,
            mime_type: mime_type.into(),
        })
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteSource for FileByteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn declared_len(&self) -> usize {
        self.declared_len
    }

    async fn read(&self) -> Result<Vec<u8>, JobmatchError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Bytes already in memory, e.g. received over a message hop.
#[derive(Debug, Clone)]
pub struct BufferSource {
    name: String,
    mime_type: String,
    declared_len: usize,
    bytes: Vec<u8>,
}

impl BufferSource {
    /// Wraps `bytes`, declaring their actual length.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            declared_len: bytes.len(),
            bytes,
        }
    }

    /// Overrides the declared length with what the sender claimed.
    #[must_use]
    pub fn with_declared_len(mut self, declared_len: usize) -> Self {
        self.declared_len = declared_len;
        self
    }
}

#[async_trait]
impl ByteSource for BufferSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn declared_len(&self) -> usize {
        self.declared_len
    }

    async fn read(&self) -> Result<Vec<u8>, JobmatchError> {
        Ok(self.bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new(1024);
        assert!(store.is_empty());

        store.set("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.used_bytes(), br#"{"a":1}"#.len());

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_capacity() {
        let store = MemoryStore::new(10);
        store.set("a", json!("12345")).await.unwrap();

        let err = store.set("b", json!("123456")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::QuotaExceeded {
                required: 15,
                capacity: 10
            }
        );
        assert_eq!(store.len(), 1);

        // Replacing a key only counts the new value.
        store.set("a", json!("12345678")).await.unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[tokio::test]
    async fn test_file_byte_source() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let source = FileByteSource::open(file.path(), "application/pdf").await.unwrap();
        assert_eq!(source.declared_len(), 13);
        assert_eq!(source.mime_type(), "application/pdf");
        assert!(source.name().ends_with(".pdf"));
        assert_eq!(source.read().await.unwrap(), b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn test_file_byte_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileByteSource::open(dir.path().join("missing.pdf"), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, JobmatchError::Io(_)));
    }

    #[tokio::test]
    async fn test_buffer_source_declared_len() {
        let source = BufferSource::new("cv.pdf", "application/pdf", vec![1, 2, 3]).with_declared_len(5);
        assert_eq!(source.declared_len(), 5);
        assert_eq!(source.read().await.unwrap().len(), 3);
    }
}
