//! Error types for the jobmatch library.
//!
//! Each failure class gets its own enum so callers can react to it
//! precisely; [`JobmatchError`] wraps them all for APIs that cross classes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for jobmatch operations.
#[derive(Debug, Error)]
pub enum JobmatchError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No extraction strategy produced an adequate job record.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Encoding integrity failure.
    #[error("{0}")]
    Encoding(#[from] EncodingError),

    /// Decoding integrity failure.
    #[error("{0}")]
    Decoding(#[from] DecodingError),

    /// Key/value store failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for JobmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// What a caller should offer the user after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryHint {
    /// Fix the input and try again.
    FixInput,
    /// Retry extraction, possibly after the page finished loading.
    RetryExtraction,
    /// Re-acquire the file from its source; retrying the same bytes fails again.
    ReuploadFile,
    /// Check storage capacity or backend health.
    CheckStorage,
}

impl JobmatchError {
    /// Stable error code for logs and UI lookups.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "JOBMATCH-VALIDATION",
            Self::Extraction(_) => "JOBMATCH-EXTRACTION",
            Self::Encoding(_) => "JOBMATCH-ENCODING",
            Self::Decoding(_) => "JOBMATCH-DECODING",
            Self::Store(_) => "JOBMATCH-STORE",
            Self::Config(_) => "JOBMATCH-CONFIG",
            Self::Serialization(_) => "JOBMATCH-SERIALIZATION",
            Self::Io(_) => "JOBMATCH-IO",
        }
    }

    /// Returns the recovery action a caller should offer.
    #[must_use]
    pub fn user_hint(&self) -> RecoveryHint {
        match self {
            Self::Validation(ValidationError::TransferSizeMismatch { .. })
            | Self::Encoding(_)
            | Self::Decoding(_)
            | Self::Store(StoreError::CorruptEntry { .. }) => RecoveryHint::ReuploadFile,
            Self::Validation(_) | Self::Config(_) | Self::Serialization(_) => {
                RecoveryHint::FixInput
            }
            Self::Extraction(_) => RecoveryHint::RetryExtraction,
            Self::Store(_) | Self::Io(_) => RecoveryHint::CheckStorage,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("hint".to_string(), serde_json::json!(self.user_hint()));
        map
    }
}

/// Malformed or missing input to a core operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The file bytes are empty.
    #[error("File content is empty")]
    EmptyFile,

    /// The file name is empty.
    #[error("File name is required")]
    EmptyFileName,

    /// The job record carries no title, company, responsibilities or requirements.
    #[error("Job data appears to be empty or invalid")]
    InadequateJob,

    /// The MIME type is not accepted.
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedMimeType {
        /// The rejected MIME type.
        mime_type: String,
    },

    /// The file exceeds the size limit.
    #[error("File size {size} exceeds the limit of {max} bytes")]
    FileTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Maximum size in bytes.
        max: usize,
    },

    /// The file name exceeds the length limit.
    #[error("File name is too long ({length} > {max} characters)")]
    FileNameTooLong {
        /// Actual length in characters.
        length: usize,
        /// Maximum length in characters.
        max: usize,
    },

    /// A CV with the same name and size is already stored.
    #[error("CV '{name}' ({size} bytes) already exists")]
    DuplicateCv {
        /// The file name.
        name: String,
        /// The file size.
        size: usize,
    },

    /// No stored CV has the given id.
    #[error("CV not found: {id}")]
    UnknownCv {
        /// The requested id.
        id: String,
    },

    /// The bytes received over a message hop differ from the declared size.
    #[error("Transferred file size mismatch: declared {declared} bytes, received {received}")]
    TransferSizeMismatch {
        /// Size declared by the sender.
        declared: usize,
        /// Size actually received.
        received: usize,
    },

    /// A multipart part could not be built.
    #[error("Invalid multipart part '{part}': {reason}")]
    InvalidPart {
        /// The part name.
        part: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// No strategy produced an adequate job record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The extractor does not recognise the page.
    #[error("Page is not a valid job page for the {extractor} extractor")]
    InvalidPage {
        /// Extractor name.
        extractor: String,
    },

    /// The extractor ran but produced nothing usable.
    #[error("Unable to extract meaningful job information from this page ({extractor})")]
    Inadequate {
        /// Extractor name.
        extractor: String,
    },

    /// Every strategy was tried without success.
    #[error("{}", exhausted_message(.last))]
    Exhausted {
        /// The last error recorded while walking the chain.
        last: Option<Box<ExtractionError>>,
    },
}

fn exhausted_message(last: &Option<Box<ExtractionError>>) -> String {
    last.as_ref().map_or_else(
        || "No extractor could process this page".to_string(),
        ToString::to_string,
    )
}

impl ExtractionError {
    /// Creates an invalid page error.
    #[must_use]
    pub fn invalid_page(extractor: impl Into<String>) -> Self {
        Self::InvalidPage {
            extractor: extractor.into(),
        }
    }

    /// Creates an inadequate record error.
    #[must_use]
    pub fn inadequate(extractor: impl Into<String>) -> Self {
        Self::Inadequate {
            extractor: extractor.into(),
        }
    }

    /// Creates an exhausted-chain error.
    #[must_use]
    pub fn exhausted(last: Option<Self>) -> Self {
        Self::Exhausted {
            last: last.map(Box::new),
        }
    }
}

/// Binary-to-text encoding failed its integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Nothing to encode.
    #[error("Cannot encode empty content")]
    EmptyInput,

    /// A chunk could not be transformed.
    #[error("Failed to encode chunk at offset {offset}: {reason}")]
    Chunk {
        /// Byte offset of the failing chunk.
        offset: usize,
        /// Underlying reason.
        reason: String,
    },

    /// The encoded text does not account for the original length.
    #[error("Encoded size mismatch: original {original} bytes, encoded text accounts for {estimated}")]
    LengthMismatch {
        /// Original byte length.
        original: usize,
        /// `floor(len(text) * 3 / 4)`.
        estimated: usize,
    },
}

/// Text-to-binary decoding failed its integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    /// Nothing to decode.
    #[error("Cannot decode empty content")]
    EmptyInput,

    /// The text contains characters outside the base64 alphabet.
    #[error("Invalid base64 string format")]
    InvalidAlphabet,

    /// The text is in the alphabet but is not valid base64.
    #[error("Malformed base64 content: {reason}")]
    Malformed {
        /// Underlying reason.
        reason: String,
    },

    /// The decoded length differs from the declared length.
    #[error("Decoded size mismatch: declared {declared} bytes, decoded {decoded}")]
    LengthMismatch {
        /// Declared byte length.
        declared: usize,
        /// Decoded byte length.
        decoded: usize,
    },
}

/// Key/value store failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Writing would exceed the store's capacity.
    #[error("Storage quota exceeded: need {required} bytes, capacity is {capacity}")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        required: usize,
        /// Capacity in bytes.
        capacity: usize,
    },

    /// A stored value could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serialization(String),

    /// A stored entry failed verification on read-back.
    #[error("Stored entry '{key}' is corrupt: {reason}")]
    CorruptEntry {
        /// The store key.
        key: String,
        /// What failed.
        reason: String,
    },
}
