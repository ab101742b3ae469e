//! Chunked binary-to-text codec for moving CV files through text-only
//! channels.
//!
//! Bytes are encoded with the standard base64 alphabet. Encoding streams the
//! input through a base64 writer in fixed-size chunks, so the output is
//! identical to a whole-buffer encode while the working set stays bounded.
//! Every boundary crossing is checked: the encoded text must account for the
//! original length, and decoded bytes must match the declared length.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::write::EncoderStringWriter;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write as _;
use tracing::{debug, error, info, warn};

use crate::config::CodecConfig;
use crate::errors::{DecodingError, EncodingError};
use crate::observability::SpanTimer;

/// Encoded file content with the byte length it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedBlob {
    /// Length of the original bytes.
    pub original_byte_length: usize,
    /// Base64 text.
    pub encoded_text: String,
}

impl EncodedBlob {
    /// Wraps already-encoded text.
    #[must_use]
    pub fn new(original_byte_length: usize, encoded_text: impl Into<String>) -> Self {
        Self {
            original_byte_length,
            encoded_text: encoded_text.into(),
        }
    }

    /// `floor(len(text) * 3 / 4)`, the byte count the text can carry.
    #[must_use]
    pub fn estimated_byte_length(&self) -> usize {
        estimate_len(&self.encoded_text)
    }

    /// Renders a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self, mime_type: &str) -> String {
        format!("data:{mime_type};base64,{}", self.encoded_text)
    }
}

/// A leading byte signature identifying a file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSignature {
    /// `%PDF`.
    Pdf,
    /// Any other prefix.
    Custom(Vec<u8>),
}

impl FileSignature {
    /// Maps an ASCII signature onto a known format where possible.
    #[must_use]
    pub fn from_ascii(signature: &str) -> Self {
        if signature == "%PDF" {
            Self::Pdf
        } else {
            Self::Custom(signature.as_bytes().to_vec())
        }
    }

    /// The signature bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Pdf => b"%PDF",
            Self::Custom(bytes) => bytes,
        }
    }
}

impl fmt::Display for FileSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.bytes()))
    }
}

/// Outcome of comparing content against a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The content starts with the signature.
    Matched,
    /// The content starts with other bytes.
    Mismatch {
        /// The leading bytes actually present.
        found: Vec<u8>,
    },
    /// The content is shorter than the signature.
    TooShort,
}

/// Compares the leading bytes of `bytes` with `signature`.
#[must_use]
pub fn sniff(bytes: &[u8], signature: &FileSignature) -> SignatureCheck {
    let expected = signature.bytes();
    if bytes.len() < expected.len() {
        return SignatureCheck::TooShort;
    }
    let head = &bytes[..expected.len()];
    if head == expected {
        SignatureCheck::Matched
    } else {
        SignatureCheck::Mismatch {
            found: head.to_vec(),
        }
    }
}

fn estimate_len(text: &str) -> usize {
    text.len() * 3 / 4
}

/// Checks that `text` accounts for `original_len` bytes within `tolerance`.
///
/// # Errors
///
/// Returns [`EncodingError::LengthMismatch`] when the difference exceeds
/// `tolerance`.
pub fn verify_encoded(original_len: usize, text: &str, tolerance: usize) -> Result<(), EncodingError> {
    let estimated = estimate_len(text);
    if original_len.abs_diff(estimated) > tolerance {
        error!(original_len, estimated, "Encoded size integrity check failed");
        return Err(EncodingError::LengthMismatch {
            original: original_len,
            estimated,
        });
    }
    Ok(())
}

/// Checks that exactly `declared` bytes were decoded.
///
/// # Errors
///
/// Returns [`DecodingError::LengthMismatch`] on any difference.
pub fn verify_decoded(declared: usize, bytes: &[u8]) -> Result<(), DecodingError> {
    if bytes.len() != declared {
        error!(declared, decoded = bytes.len(), "Decoded size integrity check failed");
        return Err(DecodingError::LengthMismatch {
            declared,
            decoded: bytes.len(),
        });
    }
    Ok(())
}

/// Removes a leading `data:<mime>;base64,` prefix, if present.
#[must_use]
pub fn strip_data_url(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("data:") else {
        return text;
    };
    match rest.split_once(";base64,") {
        Some((mime, payload)) if !mime.is_empty() && !mime.contains(';') => payload,
        _ => text,
    }
}

/// Whether `text` is base64 alphabet characters followed by at most two `=`.
fn is_base64_text(text: &str) -> bool {
    let body = text.trim_end_matches('=');
    text.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Resumable encoder: feed chunks as they become available, then finish.
pub struct StreamingEncoder {
    writer: EncoderStringWriter<'static, GeneralPurpose, String>,
    consumed: usize,
    chunks: usize,
    tolerance: usize,
    progress_every: usize,
}

impl fmt::Debug for StreamingEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingEncoder")
            .field("consumed", &self.consumed)
            .field("chunks", &self.chunks)
            .finish_non_exhaustive()
    }
}

impl StreamingEncoder {
    fn new(tolerance: usize, progress_every: usize) -> Self {
        Self {
            writer: EncoderStringWriter::new(&STANDARD),
            consumed: 0,
            chunks: 0,
            tolerance,
            progress_every: progress_every.max(1),
        }
    }

    /// Bytes fed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Encodes one chunk. Partial 3-byte groups carry over to the next call.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Chunk`] when the writer rejects the chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), EncodingError> {
        self.writer
            .write_all(chunk)
            .map_err(|e| EncodingError::Chunk {
                offset: self.consumed,
                reason: e.to_string(),
            })?;
        self.consumed += chunk.len();
        self.chunks += 1;
        if self.chunks % self.progress_every == 0 {
            debug!(chunks = self.chunks, bytes = self.consumed, "Encoding progress");
        }
        Ok(())
    }

    /// Flushes the trailing group and checks the result.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::EmptyInput`] when nothing was fed and
    /// [`EncodingError::LengthMismatch`] when the text fails the integrity
    /// check.
    pub fn finish(self) -> Result<EncodedBlob, EncodingError> {
        if self.consumed == 0 {
            return Err(EncodingError::EmptyInput);
        }
        let text = self.writer.into_inner();
        verify_encoded(self.consumed, &text, self.tolerance)?;
        Ok(EncodedBlob::new(self.consumed, text))
    }
}

/// Converts file bytes to base64 text and back.
#[derive(Debug, Clone)]
pub struct BinaryTextCodec {
    config: CodecConfig,
    signature: Option<FileSignature>,
    decoder: GeneralPurpose,
}

impl Default for BinaryTextCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTextCodec {
    /// Creates a codec with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Creates a codec.
    #[must_use]
    pub fn with_config(config: CodecConfig) -> Self {
        let signature = config.expected_signature.as_deref().map(FileSignature::from_ascii);
        let decoder = GeneralPurpose::new(
            &alphabet::STANDARD,
            GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
        );
        Self {
            config,
            signature,
            decoder,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Starts a resumable encode.
    #[must_use]
    pub fn streaming_encoder(&self) -> StreamingEncoder {
        StreamingEncoder::new(self.config.length_tolerance, self.config.progress_every_chunks)
    }

    /// Encodes `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] for empty input, a failed chunk or a failed
    /// integrity check.
    pub fn encode(&self, bytes: &[u8]) -> Result<EncodedBlob, EncodingError> {
        if bytes.is_empty() {
            return Err(EncodingError::EmptyInput);
        }
        let timer = SpanTimer::start("encode");
        self.check_signature(bytes);

        let mut encoder = self.streaming_encoder();
        for chunk in bytes.chunks(self.config.chunk_size.max(1)) {
            encoder.feed(chunk)?;
        }
        let blob = encoder.finish()?;

        info!(
            bytes = blob.original_byte_length,
            encoded_len = blob.encoded_text.len(),
            duration_ms = timer.finish(),
            "Encoded content"
        );
        Ok(blob)
    }

    /// Decodes base64 text, with or without a `data:` URL prefix and with or
    /// without padding.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] for empty input, characters outside the
    /// alphabet or malformed base64.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, DecodingError> {
        let payload = strip_data_url(text.trim());
        if payload.is_empty() {
            return Err(DecodingError::EmptyInput);
        }
        if !is_base64_text(payload) {
            error!(len = payload.len(), "Rejected text outside the base64 alphabet");
            return Err(DecodingError::InvalidAlphabet);
        }

        let timer = SpanTimer::start("decode");
        // Chunks must hold whole 4-character groups.
        let chunk_chars = (self.config.chunk_size / 4).max(1) * 4;
        let mut bytes = Vec::with_capacity(estimate_len(payload));
        for (index, chunk) in payload.as_bytes().chunks(chunk_chars).enumerate() {
            self.decoder
                .decode_vec(chunk, &mut bytes)
                .map_err(|e| DecodingError::Malformed {
                    reason: format!("chunk {index}: {e}"),
                })?;
        }

        self.check_signature(&bytes);
        debug!(
            encoded_len = payload.len(),
            bytes = bytes.len(),
            duration_ms = timer.finish(),
            "Decoded content"
        );
        Ok(bytes)
    }

    /// Decodes a blob and checks the result against its declared length.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] when decoding fails or the length differs.
    pub fn decode_blob(&self, blob: &EncodedBlob) -> Result<Vec<u8>, DecodingError> {
        let bytes = self.decode(&blob.encoded_text)?;
        verify_decoded(blob.original_byte_length, &bytes)?;
        Ok(bytes)
    }

    /// Sniffs `bytes` against the expected signature and logs anything
    /// unusual. Never fails.
    pub fn check_signature(&self, bytes: &[u8]) -> Option<SignatureCheck> {
        let signature = self.signature.as_ref()?;
        let check = sniff(bytes, signature);
        match &check {
            SignatureCheck::Matched if bytes.len() < self.config.suspicious_size_bytes => {
                warn!(
                    bytes = bytes.len(),
                    signature = %signature,
                    "Content is unusually small, it may be truncated"
                );
            }
            SignatureCheck::Matched => {}
            SignatureCheck::Mismatch { found } => {
                warn!(
                    expected = %signature,
                    found = %String::from_utf8_lossy(found),
                    "Content does not start with the expected signature"
                );
            }
            SignatureCheck::TooShort => {
                warn!(bytes = bytes.len(), signature = %signature, "Content is shorter than its signature");
            }
        }
        Some(check)
    }
}
