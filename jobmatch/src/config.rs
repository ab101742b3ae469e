//! Configuration types for extraction, the codec, submissions and CV storage.
//!
//! Every field has a serde default, so a partial JSON document only needs to
//! name the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::JobmatchError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobmatchConfig {
    /// Extraction tunables.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Codec tunables.
    #[serde(default)]
    pub codec: CodecConfig,
    /// Submission tunables.
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// CV storage tunables.
    #[serde(default)]
    pub store: StoreConfig,
}

impl JobmatchConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, JobmatchError> {
        serde_json::from_str(json).map_err(|e| JobmatchError::Config(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JobmatchError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Configuration for job-posting extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionConfig {
    /// Shortest fragment (in characters) the classifier will consider.
    #[serde(default = "default_min_fragment")]
    pub min_fragment_chars: usize,
    /// Longest fragment (in characters) the classifier will consider.
    #[serde(default = "default_max_fragment")]
    pub max_fragment_chars: usize,
    /// Cap on responsibilities and on requirements.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Cap on raw items harvested from a single section.
    #[serde(default = "default_max_section_items")]
    pub max_section_items: usize,
    /// Longest text an element may carry and still count as a section heading.
    #[serde(default = "default_heading_chars")]
    pub section_heading_max_chars: usize,
    /// Inclusive lower bound on company name length.
    #[serde(default = "default_company_min")]
    pub company_min_chars: usize,
    /// Exclusive upper bound on company name length.
    #[serde(default = "default_company_max")]
    pub company_max_chars: usize,
    /// Exclusive upper bound on a page title used as a job title.
    #[serde(default = "default_page_title_max")]
    pub page_title_max_chars: usize,
    /// Platform brand names that must never be reported as a company and are
    /// treated as page noise.
    #[serde(default = "default_brand_terms")]
    pub brand_terms: Vec<String>,
}

fn default_min_fragment() -> usize {
    8
}

fn default_max_fragment() -> usize {
    500
}

fn default_max_items() -> usize {
    15
}

fn default_max_section_items() -> usize {
    20
}

fn default_heading_chars() -> usize {
    80
}

fn default_company_min() -> usize {
    4
}

fn default_company_max() -> usize {
    100
}

fn default_page_title_max() -> usize {
    100
}

fn default_brand_terms() -> Vec<String> {
    vec!["jobsdb".to_string()]
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_fragment_chars: default_min_fragment(),
            max_fragment_chars: default_max_fragment(),
            max_items: default_max_items(),
            max_section_items: default_max_section_items(),
            section_heading_max_chars: default_heading_chars(),
            company_min_chars: default_company_min(),
            company_max_chars: default_company_max(),
            page_title_max_chars: default_page_title_max(),
            brand_terms: default_brand_terms(),
        }
    }
}

impl ExtractionConfig {
    /// Creates a new extraction configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the item cap.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Adds a brand term.
    #[must_use]
    pub fn with_brand_term(mut self, term: impl Into<String>) -> Self {
        self.brand_terms.push(term.into());
        self
    }

    /// Whether `text` mentions one of the platform brands.
    #[must_use]
    pub fn mentions_brand(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.brand_terms
            .iter()
            .any(|b| !b.is_empty() && lower.contains(&b.to_lowercase()))
    }
}

/// Configuration for the binary/text codec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodecConfig {
    /// Bytes processed per encode chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Allowed slack between the original length and `floor(len * 3 / 4)`.
    #[serde(default = "default_tolerance")]
    pub length_tolerance: usize,
    /// Leading signature expected of decoded content, if any.
    #[serde(default = "default_signature")]
    pub expected_signature: Option<String>,
    /// Content carrying the expected signature but smaller than this is
    /// reported as possibly truncated.
    #[serde(default = "default_suspicious_size")]
    pub suspicious_size_bytes: usize,
    /// Emit a progress event every N chunks.
    #[serde(default = "default_progress_every")]
    pub progress_every_chunks: usize,
}

fn default_chunk_size() -> usize {
    8192
}

fn default_tolerance() -> usize {
    3
}

#[allow(clippy::unnecessary_wraps)]
fn default_signature() -> Option<String> {
    Some("%PDF".to_string())
}

fn default_suspicious_size() -> usize {
    1000
}

fn default_progress_every() -> usize {
    10
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            length_tolerance: default_tolerance(),
            expected_signature: default_signature(),
            suspicious_size_bytes: default_suspicious_size(),
            progress_every_chunks: default_progress_every(),
        }
    }
}

impl CodecConfig {
    /// Creates a new codec configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size. Zero is clamped to one.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Disables signature sniffing.
    #[must_use]
    pub fn without_signature(mut self) -> Self {
        self.expected_signature = None;
        self
    }
}

/// Configuration for assembling submissions to the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionConfig {
    /// Source tag stamped on every submission.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    /// Payload version stamped on every submission.
    #[serde(default = "default_version")]
    pub version: String,
    /// Multipart field carrying the job JSON.
    #[serde(default = "default_job_part")]
    pub job_details_part: String,
    /// Multipart field carrying the CV bytes.
    #[serde(default = "default_file_part")]
    pub file_part: String,
    /// Multipart field carrying the submission timestamp.
    #[serde(default = "default_timestamp_part")]
    pub timestamp_part: String,
    /// Multipart field carrying the source tag.
    #[serde(default = "default_source_part")]
    pub source_part: String,
    /// Title sent when none was extracted.
    #[serde(default = "default_unknown_title")]
    pub unknown_title: String,
    /// Company sent when none was extracted.
    #[serde(default = "default_unknown_company")]
    pub unknown_company: String,
}

fn default_source_tag() -> String {
    "jobsdb-extension".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_job_part() -> String {
    "jobDetails".to_string()
}

fn default_file_part() -> String {
    "cvFile".to_string()
}

fn default_timestamp_part() -> String {
    "timestamp".to_string()
}

fn default_source_part() -> String {
    "source".to_string()
}

fn default_unknown_title() -> String {
    "Unknown Position".to_string()
}

fn default_unknown_company() -> String {
    "Unknown Company".to_string()
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            source_tag: default_source_tag(),
            version: default_version(),
            job_details_part: default_job_part(),
            file_part: default_file_part(),
            timestamp_part: default_timestamp_part(),
            source_part: default_source_part(),
            unknown_title: default_unknown_title(),
            unknown_company: default_unknown_company(),
        }
    }
}

impl SubmissionConfig {
    /// Creates a new submission configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source tag.
    #[must_use]
    pub fn with_source_tag(mut self, tag: impl Into<String>) -> Self {
        self.source_tag = tag.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Configuration for CV storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Number of CVs kept; older ones are evicted.
    #[serde(default = "default_max_cvs")]
    pub max_cvs: usize,
    /// Key holding the CV list.
    #[serde(default = "default_list_key")]
    pub list_key: String,
    /// Key holding the current CV.
    #[serde(default = "default_current_key")]
    pub current_key: String,
    /// MIME types accepted on upload.
    #[serde(default = "default_allowed_mime")]
    pub allowed_mime_types: Vec<String>,
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    /// Longest accepted file name in characters.
    #[serde(default = "default_max_name")]
    pub max_name_chars: usize,
    /// Capacity of the bundled in-memory store in bytes.
    #[serde(default = "default_capacity")]
    pub capacity_bytes: usize,
}

fn default_max_cvs() -> usize {
    10
}

fn default_list_key() -> String {
    "cvList".to_string()
}

fn default_current_key() -> String {
    "currentCV".to_string()
}

fn default_allowed_mime() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_max_name() -> usize {
    255
}

fn default_capacity() -> usize {
    10 * 1024 * 1024
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_cvs: default_max_cvs(),
            list_key: default_list_key(),
            current_key: default_current_key(),
            allowed_mime_types: default_allowed_mime(),
            max_file_size: default_max_file_size(),
            max_name_chars: default_max_name(),
            capacity_bytes: default_capacity(),
        }
    }
}

impl StoreConfig {
    /// Creates a new store configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of CVs kept.
    #[must_use]
    pub fn with_max_cvs(mut self, max_cvs: usize) -> Self {
        self.max_cvs = max_cvs;
        self
    }

    /// Accepts an additional MIME type on upload.
    #[must_use]
    pub fn with_allowed_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.allowed_mime_types.push(mime_type.into());
        self
    }

    /// Sets the largest accepted upload.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }
}
