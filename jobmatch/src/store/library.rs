//! The user's CV library: upload validation, a bounded most-recent-first
//! list, the current selection, and integrity checks on every write.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{ByteSource, KeyValueStore};
use crate::codec::{BinaryTextCodec, EncodedBlob};
use crate::config::{CodecConfig, StoreConfig};
use crate::errors::{JobmatchError, StoreError, ValidationError};
use crate::utils::{char_len, generate_uuid, Clock, SystemClock, Timestamp};

/// A CV held in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCv {
    /// UUID v4.
    pub id: String,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: usize,
    /// MIME type.
    pub mime_type: String,
    /// When it was uploaded.
    pub uploaded_at: Timestamp,
    /// When it was last made current.
    pub last_used: Timestamp,
    /// Hex SHA-256 of the original bytes.
    pub sha256: String,
    /// Encoded content.
    pub content: EncodedBlob,
}

/// Summary of the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvStatistics {
    /// Number of stored CVs.
    pub total_cvs: usize,
    /// Whether a CV is selected.
    pub has_current_cv: bool,
    /// Name of the selected CV.
    pub current_cv_name: Option<String>,
    /// Upload time of the newest CV.
    pub last_upload_date: Option<Timestamp>,
    /// Sum of all CV sizes.
    pub total_file_size: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Manages CVs in a [`KeyValueStore`].
///
/// The list lives under one key, newest first, and holds at most
/// `max_cvs` entries. The current selection is stored as an id under a
/// second key.
pub struct CvLibrary {
    store: Arc<dyn KeyValueStore>,
    codec: BinaryTextCodec,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CvLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CvLibrary")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl CvLibrary {
    /// Creates a library over `store` with default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, StoreConfig::default(), CodecConfig::default())
    }

    /// Creates a library.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        config: StoreConfig,
        codec: CodecConfig,
    ) -> Self {
        Self {
            store,
            codec: BinaryTextCodec::with_config(codec),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for upload and last-used times.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Checks an upload's declared attributes.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: empty name, empty file,
    /// disallowed MIME type, oversize file, overlong name.
    pub fn validate(&self, name: &str, size: usize, mime_type: &str) -> Result<(), ValidationError> {
        let result = if name.trim().is_empty() {
            Err(ValidationError::EmptyFileName)
        } else if size == 0 {
            Err(ValidationError::EmptyFile)
        } else if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            Err(ValidationError::UnsupportedMimeType {
                mime_type: mime_type.to_string(),
            })
        } else if size > self.config.max_file_size {
            Err(ValidationError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            })
        } else if char_len(name) > self.config.max_name_chars {
            Err(ValidationError::FileNameTooLong {
                length: char_len(name),
                max: self.config.max_name_chars,
            })
        } else {
            Ok(())
        };

        debug!(name, size, mime_type, valid = result.is_ok(), "File validation");
        result
    }

    /// Reads, validates, encodes and stores a CV, making it current.
    ///
    /// The encoded content is checked before anything is written, and the
    /// write is verified by reading the entry back. When a write or the
    /// read-back fails, the previous list and selection are restored.
    ///
    /// # Errors
    ///
    /// Returns [`JobmatchError::Validation`] for rejected uploads (including
    /// duplicates and transfer size mismatches), [`JobmatchError::Encoding`]
    /// when encoding fails, and [`JobmatchError::Store`] or
    /// [`JobmatchError::Decoding`] when storage or read-back fails.
    pub async fn upload(&self, source: &dyn ByteSource) -> Result<StoredCv, JobmatchError> {
        let name = source.name();
        self.validate(name, source.declared_len(), source.mime_type())?;

        let bytes = source.read().await?;
        if bytes.len() != source.declared_len() {
            error!(
                name,
                declared = source.declared_len(),
                received = bytes.len(),
                "Read size differs from declared size"
            );
            return Err(ValidationError::TransferSizeMismatch {
                declared: source.declared_len(),
                received: bytes.len(),
            }
            .into());
        }

        let previous = self.list().await?;
        if previous.iter().any(|cv| cv.name == name && cv.size == bytes.len()) {
            return Err(ValidationError::DuplicateCv {
                name: name.to_string(),
                size: bytes.len(),
            }
            .into());
        }
        let previous_current = self.current_id().await?;

        let content = self.codec.encode(&bytes)?;
        let now = self.clock.now();
        let cv = StoredCv {
            id: generate_uuid().to_string(),
            name: name.to_string(),
            size: bytes.len(),
            mime_type: source.mime_type().to_string(),
            uploaded_at: now,
            last_used: now,
            sha256: sha256_hex(&bytes),
            content,
        };
        self.verify(&cv)?;

        let mut list = Vec::with_capacity(previous.len() + 1);
        list.push(cv.clone());
        list.extend(previous.iter().cloned());
        if list.len() > self.config.max_cvs {
            for evicted in list.drain(self.config.max_cvs..) {
                debug!(id = %evicted.id, name = %evicted.name, "Evicted old CV");
            }
        }

        if let Err(e) = self.commit(&list, &cv).await {
            error!(id = %cv.id, name = %cv.name, error = %e, "CV write failed, restoring library");
            if let Err(restore) = self.restore(&previous, previous_current).await {
                error!(error = %restore, "Failed to restore CV library");
            }
            return Err(e);
        }

        info!(
            id = %cv.id,
            name = %cv.name,
            size = cv.size,
            total_cvs = list.len(),
            "Stored CV"
        );
        Ok(cv)
    }

    /// Writes the list, selects `cv` and reads it back.
    async fn commit(&self, list: &[StoredCv], cv: &StoredCv) -> Result<(), JobmatchError> {
        self.write_list(list).await?;
        self.store
            .set(&self.config.current_key, Value::String(cv.id.clone()))
            .await?;
        self.load_bytes(&cv.id).await?;
        Ok(())
    }

    async fn restore(&self, list: &[StoredCv], current: Option<String>) -> Result<(), StoreError> {
        self.write_list(list).await?;
        match current {
            Some(id) => self.store.set(&self.config.current_key, Value::String(id)).await,
            None => self.store.remove(&self.config.current_key).await,
        }
    }

    /// All stored CVs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails or the list is unreadable.
    pub async fn list(&self) -> Result<Vec<StoredCv>, StoreError> {
        let Some(value) = self.store.get(&self.config.list_key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn write_list(&self, list: &[StoredCv]) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(list).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&self.config.list_key, value).await
    }

    async fn current_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(&self.config.current_key)
            .await?
            .and_then(|value| value.as_str().map(ToString::to_string)))
    }

    /// The current CV, if one is selected and still stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails.
    pub async fn current(&self) -> Result<Option<StoredCv>, StoreError> {
        let Some(id) = self.current_id().await? else {
            return Ok(None);
        };
        Ok(self.list().await?.into_iter().find(|cv| cv.id == id))
    }

    /// Selects the CV with `id` and refreshes its last-used time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCv`] when no CV has `id`.
    pub async fn set_current(&self, id: &str) -> Result<StoredCv, JobmatchError> {
        let mut list = self.list().await?;
        let cv = list
            .iter_mut()
            .find(|cv| cv.id == id)
            .ok_or_else(|| ValidationError::UnknownCv { id: id.to_string() })?;
        cv.last_used = self.clock.now();
        let cv = cv.clone();

        self.write_list(&list).await?;
        self.store
            .set(&self.config.current_key, Value::String(cv.id.clone()))
            .await?;
        info!(id = %cv.id, name = %cv.name, "Current CV updated");
        Ok(cv)
    }

    /// Removes the CV with `id`, clearing the selection if it was current.
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut list = self.list().await?;
        let before = list.len();
        list.retain(|cv| cv.id != id);
        if list.len() == before {
            return Ok(false);
        }

        self.write_list(&list).await?;
        if self.current_id().await?.as_deref() == Some(id) {
            self.store.remove(&self.config.current_key).await?;
        }
        info!(id, remaining = list.len(), "CV removed");
        Ok(true)
    }

    /// Decodes the stored bytes of CV `id`, checking length and digest.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCv`], [`JobmatchError::Decoding`]
    /// when the content does not decode to its declared length, or
    /// [`StoreError::CorruptEntry`] when the digest differs.
    pub async fn load_bytes(&self, id: &str) -> Result<Vec<u8>, JobmatchError> {
        let cv = self
            .list()
            .await?
            .into_iter()
            .find(|cv| cv.id == id)
            .ok_or_else(|| ValidationError::UnknownCv { id: id.to_string() })?;

        self.verify(&cv)
    }

    /// Decodes `cv`'s content and checks it against the recorded digest.
    fn verify(&self, cv: &StoredCv) -> Result<Vec<u8>, JobmatchError> {
        let bytes = self.codec.decode_blob(&cv.content)?;
        let digest = sha256_hex(&bytes);
        if digest != cv.sha256 {
            warn!(id = %cv.id, expected = %cv.sha256, actual = %digest, "CV digest mismatch");
            return Err(StoreError::CorruptEntry {
                key: self.config.list_key.clone(),
                reason: format!("CV {} digest mismatch", cv.id),
            }
            .into());
        }
        Ok(bytes)
    }

    /// Library summary.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails.
    pub async fn statistics(&self) -> Result<CvStatistics, StoreError> {
        let list = self.list().await?;
        let current = self.current().await?;

        let stats = CvStatistics {
            total_cvs: list.len(),
            has_current_cv: current.is_some(),
            current_cv_name: current.map(|cv| cv.name),
            last_upload_date: list.first().map(|cv| cv.uploaded_at),
            total_file_size: list.iter().map(|cv| cv.size).sum(),
        };
        debug!(total_cvs = stats.total_cvs, total_file_size = stats.total_file_size, "CV statistics");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BufferSource, MemoryStore, MockKeyValueStore};
    use crate::utils::FixedClock;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store that can truncate the stored content of `cv.pdf` or
    /// refuse writes to the current-CV key.
    #[derive(Debug)]
    struct FaultyStore {
        inner: MemoryStore,
        truncate_cv: AtomicBool,
        refuse_current: AtomicBool,
    }

    impl FaultyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(1024 * 1024),
                truncate_cv: AtomicBool::new(false),
                refuse_current: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for FaultyStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, mut value: Value) -> Result<(), StoreError> {
            if key == "currentCV" && self.refuse_current.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("write refused".to_string()));
            }
            if self.truncate_cv.load(Ordering::SeqCst) {
                for entry in value.as_array_mut().into_iter().flatten() {
                    if entry["name"] == "cv.pdf" {
                        if let Some(Value::String(text)) = entry.pointer_mut("/content/encodedText") {
                            text.truncate(400);
                        }
                    }
                }
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn library() -> (Arc<MemoryStore>, CvLibrary) {
        let store = Arc::new(MemoryStore::new(1024 * 1024));
        let library = CvLibrary::new(store.clone()).with_clock(Arc::new(FixedClock::new(at())));
        (store, library)
    }

    fn pdf(name: &str, len: usize) -> BufferSource {
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.resize(len, b'x');
        BufferSource::new(name, "application/pdf", bytes)
    }

    #[tokio::test]
    async fn test_upload_stores_and_selects() {
        let (_, library) = library();

        let cv = library.upload(&pdf("resume.pdf", 2_000)).await.unwrap();

        assert_eq!(cv.size, 2_000);
        assert_eq!(cv.uploaded_at, at());
        assert_eq!(cv.content.original_byte_length, 2_000);
        assert_eq!(library.list().await.unwrap(), vec![cv.clone()]);
        assert_eq!(library.current().await.unwrap(), Some(cv.clone()));

        let bytes = library.load_bytes(&cv.id).await.unwrap();
        assert_eq!(bytes.len(), 2_000);
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[tokio::test]
    async fn test_duplicate_upload_is_rejected() {
        let (_, library) = library();
        library.upload(&pdf("resume.pdf", 2_000)).await.unwrap();

        let err = library.upload(&pdf("resume.pdf", 2_000)).await.unwrap_err();
        assert!(matches!(
            err,
            JobmatchError::Validation(ValidationError::DuplicateCv { size: 2_000, .. })
        ));

        // Same name, different size is a different CV.
        library.upload(&pdf("resume.pdf", 2_001)).await.unwrap();
        assert_eq!(library.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_keeps_most_recent_ten() {
        let (_, library) = library();
        for i in 0..11 {
            library.upload(&pdf(&format!("cv-{i}.pdf"), 1_200)).await.unwrap();
        }

        let names: Vec<String> = library.list().await.unwrap().into_iter().map(|cv| cv.name).collect();
        let expected: Vec<String> = (1..11).rev().map(|i| format!("cv-{i}.pdf")).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_custom_limits() {
        let config = StoreConfig::new()
            .with_max_cvs(2)
            .with_allowed_mime_type("text/plain")
            .with_max_file_size(4_096);
        let library = CvLibrary::with_config(
            Arc::new(MemoryStore::new(1024 * 1024)),
            config,
            CodecConfig::new().without_signature(),
        );

        for i in 0..3 {
            let source = BufferSource::new(format!("cv-{i}.txt"), "text/plain", vec![b'a'; 100]);
            library.upload(&source).await.unwrap();
        }
        assert_eq!(library.list().await.unwrap().len(), 2);
        assert_eq!(
            library.validate("cv.pdf", 4_097, "application/pdf"),
            Err(ValidationError::FileTooLarge { size: 4_097, max: 4_096 })
        );
    }

    #[tokio::test]
    async fn test_remove_clears_current() {
        let (store, library) = library();
        let older = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();
        let newer = library.upload(&pdf("b.pdf", 1_500)).await.unwrap();

        assert!(library.remove(&newer.id).await.unwrap());
        assert_eq!(library.current().await.unwrap(), None);
        assert_eq!(store.get("currentCV").await.unwrap(), None);
        assert_eq!(library.list().await.unwrap(), vec![older.clone()]);

        assert!(!library.remove(&newer.id).await.unwrap());
        assert!(library.remove(&older.id).await.unwrap());
        assert!(library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_current() {
        let (_, library) = library();
        let older = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();
        library.upload(&pdf("b.pdf", 1_500)).await.unwrap();

        let selected = library.set_current(&older.id).await.unwrap();
        assert_eq!(selected.id, older.id);
        assert_eq!(library.current().await.unwrap().map(|cv| cv.name), Some("a.pdf".to_string()));

        let err = library.set_current("nope").await.unwrap_err();
        assert!(matches!(
            err,
            JobmatchError::Validation(ValidationError::UnknownCv { .. })
        ));
    }

    #[tokio::test]
    async fn test_statistics() {
        let (_, library) = library();
        assert_eq!(
            library.statistics().await.unwrap(),
            CvStatistics {
                total_cvs: 0,
                has_current_cv: false,
                current_cv_name: None,
                last_upload_date: None,
                total_file_size: 0,
            }
        );

        library.upload(&pdf("a.pdf", 1_500)).await.unwrap();
        library.upload(&pdf("b.pdf", 2_500)).await.unwrap();

        let stats = library.statistics().await.unwrap();
        assert_eq!(stats.total_cvs, 2);
        assert!(stats.has_current_cv);
        assert_eq!(stats.current_cv_name.as_deref(), Some("b.pdf"));
        assert_eq!(stats.last_upload_date, Some(at()));
        assert_eq!(stats.total_file_size, 4_000);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalCvs"], 2);
        assert_eq!(json["currentCvName"], "b.pdf");
    }

    #[tokio::test]
    async fn test_validation() {
        let (_, library) = library();

        assert_eq!(
            library.validate("cv.docx", 100, "application/msword"),
            Err(ValidationError::UnsupportedMimeType {
                mime_type: "application/msword".to_string()
            })
        );
        assert_eq!(
            library.validate("cv.pdf", 10 * 1024 * 1024 + 1, "application/pdf"),
            Err(ValidationError::FileTooLarge {
                size: 10 * 1024 * 1024 + 1,
                max: 10 * 1024 * 1024
            })
        );
        let long = format!("{}.pdf", "a".repeat(252));
        assert_eq!(
            library.validate(&long, 100, "application/pdf"),
            Err(ValidationError::FileNameTooLong { length: 256, max: 255 })
        );
        assert_eq!(library.validate(" ", 100, "application/pdf"), Err(ValidationError::EmptyFileName));
        assert_eq!(library.validate("cv.pdf", 0, "application/pdf"), Err(ValidationError::EmptyFile));
        assert_eq!(library.validate("cv.pdf", 100, "application/pdf"), Ok(()));
    }

    #[tokio::test]
    async fn test_transfer_size_mismatch() {
        let (_, library) = library();
        let source = pdf("cv.pdf", 1_500).with_declared_len(1_600);

        let err = library.upload(&source).await.unwrap_err();
        assert!(matches!(
            err,
            JobmatchError::Validation(ValidationError::TransferSizeMismatch {
                declared: 1_600,
                received: 1_500
            })
        ));
        assert!(library.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let store = Arc::new(MemoryStore::new(2_000));
        let library = CvLibrary::new(store);

        let err = library.upload(&pdf("big.pdf", 5_000)).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Store(StoreError::QuotaExceeded { .. })));
    }

    #[tokio::test]
    async fn test_tampered_entry_is_detected() {
        let (store, library) = library();
        let cv = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();

        let mut list = library.list().await.unwrap();
        list[0].sha256 = "0".repeat(64);
        store
            .set("cvList", serde_json::to_value(&list).unwrap())
            .await
            .unwrap();

        let err = library.load_bytes(&cv.id).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Store(StoreError::CorruptEntry { .. })));
    }

    #[tokio::test]
    async fn test_truncated_content_is_detected() {
        let (store, library) = library();
        let cv = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();

        let mut list = library.list().await.unwrap();
        list[0].content.encoded_text.truncate(400);
        store
            .set("cvList", serde_json::to_value(&list).unwrap())
            .await
            .unwrap();

        let err = library.load_bytes(&cv.id).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Decoding(_)));
        assert_eq!(err.user_hint(), crate::errors::RecoveryHint::ReuploadFile);
    }

    #[tokio::test]
    async fn test_corrupted_write_is_rolled_back() {
        let store = Arc::new(FaultyStore::new());
        let library = CvLibrary::new(store.clone());
        let kept = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();

        store.truncate_cv.store(true, Ordering::SeqCst);
        let err = library.upload(&pdf("cv.pdf", 1_500)).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Decoding(_)));
        assert_eq!(err.user_hint(), crate::errors::RecoveryHint::ReuploadFile);
        assert_eq!(library.list().await.unwrap(), vec![kept.clone()]);
        assert_eq!(library.current().await.unwrap(), Some(kept.clone()));

        store.truncate_cv.store(false, Ordering::SeqCst);
        let retried = library.upload(&pdf("cv.pdf", 1_500)).await.unwrap();
        assert_eq!(library.current().await.unwrap(), Some(retried));
        assert_eq!(library.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_first_upload_rolled_back_leaves_empty_library() {
        let store = Arc::new(FaultyStore::new());
        store.truncate_cv.store(true, Ordering::SeqCst);
        let library = CvLibrary::new(store.clone());

        assert!(library.upload(&pdf("cv.pdf", 1_500)).await.is_err());
        assert!(library.list().await.unwrap().is_empty());
        assert_eq!(library.current().await.unwrap(), None);
        assert_eq!(store.get("currentCV").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_refused_selection_restores_list() {
        let store = Arc::new(FaultyStore::new());
        let library = CvLibrary::new(store.clone());
        let kept = library.upload(&pdf("a.pdf", 1_500)).await.unwrap();

        store.refuse_current.store(true, Ordering::SeqCst);
        let err = library.upload(&pdf("b.pdf", 1_500)).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Store(StoreError::Backend(_))));
        assert_eq!(library.list().await.unwrap(), vec![kept.clone()]);
        assert_eq!(library.current().await.unwrap(), Some(kept));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Backend("offline".to_string())));
        store.expect_set().never();
        let library = CvLibrary::new(Arc::new(store));

        assert_eq!(
            library.list().await.unwrap_err(),
            StoreError::Backend("offline".to_string())
        );
        let err = library.upload(&pdf("a.pdf", 1_500)).await.unwrap_err();
        assert!(matches!(err, JobmatchError::Store(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_unreadable_list() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .withf(|key| key == "cvList")
            .returning(|_| Ok(Some(serde_json::json!("not a list"))));
        let library = CvLibrary::new(Arc::new(store));

        assert!(matches!(
            library.list().await.unwrap_err(),
            StoreError::Serialization(_)
        ));
    }
}
