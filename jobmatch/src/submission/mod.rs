//! Assembles the payload sent to the remote analysis service.
//!
//! A submission pairs an adequate [`JobRecord`] with the CV bytes and a small
//! metadata block. The service receives it as a multipart body: a JSON
//! `jobDetails` part, the file part, and two text parts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::SubmissionConfig;
use crate::errors::ValidationError;
use crate::extractors::JobRecord;
use crate::utils::{format_iso8601, Clock, SystemClock, Timestamp};

/// The CV file attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFile {
    /// Raw file bytes.
    pub bytes: Vec<u8>,
    /// File name as uploaded.
    pub name: String,
    /// MIME type as uploaded.
    pub mime_type: String,
    /// Size the bytes were declared with when the submission was built.
    pub declared_size: usize,
}

impl SubmissionFile {
    /// Checks the bytes still match the declared size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TransferSizeMismatch`] on any difference.
    pub fn verify(&self) -> Result<(), ValidationError> {
        if self.bytes.len() != self.declared_size {
            error!(
                name = %self.name,
                declared = self.declared_size,
                received = self.bytes.len(),
                "Attached file does not match its declared size"
            );
            return Err(ValidationError::TransferSizeMismatch {
                declared: self.declared_size,
                received: self.bytes.len(),
            });
        }
        Ok(())
    }
}

/// Metadata stamped on every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    /// When the submission was assembled.
    pub extracted_at: Timestamp,
    /// Identifies the sending client.
    pub source_tag: String,
    /// Payload version.
    pub version: String,
}

/// One part of the multipart body, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MultipartField {
    /// A text part.
    Text {
        /// Part name.
        name: String,
        /// Part value.
        value: String,
    },
    /// A file part.
    #[serde(rename_all = "camelCase")]
    File {
        /// Part name.
        name: String,
        /// File name sent with the part.
        file_name: String,
        /// Content type of the part.
        mime_type: String,
        /// Byte length.
        size: usize,
    },
}

impl MultipartField {
    /// The part name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// A job record paired with a CV, ready for one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSubmission {
    /// The extracted job.
    pub job: JobRecord,
    /// The CV.
    pub file: SubmissionFile,
    /// Submission metadata.
    pub metadata: SubmissionMetadata,
    parts: SubmissionConfig,
}

impl EnrichedSubmission {
    /// The JSON sent as the job details part. Missing titles and companies
    /// are replaced with placeholders so the service always sees strings.
    #[must_use]
    pub fn job_details_json(&self) -> Value {
        let details = serde_json::to_value(&self.job.details).unwrap_or(Value::Null);
        json!({
            "title": self.job.title.as_deref().unwrap_or(&self.parts.unknown_title),
            "company": self.job.company.as_deref().unwrap_or(&self.parts.unknown_company),
            "responsibilities": self.job.responsibilities,
            "requirements": self.job.requirements,
            "details": details,
            "metadata": {
                "extractedAt": format_iso8601(&self.metadata.extracted_at),
                "source": self.metadata.source_tag,
                "version": self.metadata.version,
            },
        })
    }

    /// Describes the multipart body in send order.
    #[must_use]
    pub fn multipart_fields(&self) -> Vec<MultipartField> {
        let fields = vec![
            MultipartField::Text {
                name: self.parts.job_details_part.clone(),
                value: self.job_details_json().to_string(),
            },
            MultipartField::File {
                name: self.parts.file_part.clone(),
                file_name: self.file.name.clone(),
                mime_type: self.file.mime_type.clone(),
                size: self.file.bytes.len(),
            },
            MultipartField::Text {
                name: self.parts.timestamp_part.clone(),
                value: format_iso8601(&self.metadata.extracted_at),
            },
            MultipartField::Text {
                name: self.parts.source_part.clone(),
                value: self.metadata.source_tag.clone(),
            },
        ];
        debug!(parts = fields.len(), file_bytes = self.file.bytes.len(), "Described multipart body");
        fields
    }

    /// Builds the multipart form for the analysis request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TransferSizeMismatch`] when the file no
    /// longer matches its declared size and [`ValidationError::InvalidPart`]
    /// when the MIME type cannot be used as a content type.
    #[cfg(feature = "submit")]
    pub fn to_multipart_form(&self) -> Result<reqwest::multipart::Form, ValidationError> {
        use reqwest::multipart::{Form, Part};

        self.file.verify()?;

        let mut form = Form::new();
        for field in self.multipart_fields() {
            form = match field {
                MultipartField::Text { name, value } => form.text(name, value),
                MultipartField::File {
                    name,
                    file_name,
                    mime_type,
                    ..
                } => {
                    let part = Part::bytes(self.file.bytes.clone())
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(|e| ValidationError::InvalidPart {
                            part: name.clone(),
                            reason: e.to_string(),
                        })?;
                    form.part(name, part)
                }
            };
        }
        debug!(boundary = form.boundary(), "Built multipart form");
        Ok(form)
    }
}

/// Builds [`EnrichedSubmission`]s.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    config: SubmissionConfig,
    clock: Arc<dyn Clock>,
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordAssembler {
    /// Creates an assembler with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SubmissionConfig::default())
    }

    /// Creates an assembler.
    #[must_use]
    pub fn with_config(config: SubmissionConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to stamp submissions.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Pairs `job` with the CV.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InadequateJob`], [`ValidationError::EmptyFile`]
    /// or [`ValidationError::EmptyFileName`].
    pub fn assemble(
        &self,
        job: JobRecord,
        file_bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<EnrichedSubmission, ValidationError> {
        if !job.is_adequate() {
            return Err(ValidationError::InadequateJob);
        }
        if file_bytes.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if file_name.trim().is_empty() {
            return Err(ValidationError::EmptyFileName);
        }

        let submission = EnrichedSubmission {
            file: SubmissionFile {
                declared_size: file_bytes.len(),
                bytes: file_bytes,
                name: file_name.to_string(),
                mime_type: mime_type.to_string(),
            },
            metadata: SubmissionMetadata {
                extracted_at: self.clock.now(),
                source_tag: self.config.source_tag.clone(),
                version: self.config.version.clone(),
            },
            parts: self.config.clone(),
            job,
        };

        info!(
            title = submission.job.title.as_deref().unwrap_or_default(),
            file = %submission.file.name,
            bytes = submission.file.declared_size,
            "Assembled submission"
        );
        Ok(submission)
    }

    /// Like [`assemble`](Self::assemble), for bytes that crossed a
    /// message-passing hop with a declared size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TransferSizeMismatch`] when the received
    /// bytes differ from `declared_size`, otherwise as
    /// [`assemble`](Self::assemble).
    pub fn assemble_transferred(
        &self,
        job: JobRecord,
        file_bytes: Vec<u8>,
        declared_size: usize,
        file_name: &str,
        mime_type: &str,
    ) -> Result<EnrichedSubmission, ValidationError> {
        if file_bytes.len() != declared_size {
            error!(declared = declared_size, received = file_bytes.len(), "Transfer size mismatch");
            return Err(ValidationError::TransferSizeMismatch {
                declared: declared_size,
                received: file_bytes.len(),
            });
        }
        self.assemble(job, file_bytes, file_name, mime_type)
    }
}
