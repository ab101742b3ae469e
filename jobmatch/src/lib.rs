//! # Jobmatch
//!
//! Job-posting extraction and CV transport for job/CV matching.
//!
//! The crate covers two pipelines:
//!
//! - **Extraction**: an [`ExtractionCoordinator`](coordinator::ExtractionCoordinator)
//!   walks a chain of site extractors over a parsed document and returns the
//!   first adequate [`JobRecord`](extractors::JobRecord). A bilingual
//!   [`TextClassifier`](classifier::TextClassifier) separates responsibilities
//!   from requirements from page noise.
//! - **Transport**: the [`BinaryTextCodec`](codec::BinaryTextCodec) turns CV
//!   bytes into base64 text and back in bounded chunks, checking integrity at
//!   every hop. The [`CvLibrary`](store::CvLibrary) keeps encoded CVs in a
//!   key/value store and the [`RecordAssembler`](submission::RecordAssembler)
//!   pairs a CV with a job for the analysis service.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jobmatch::prelude::*;
//!
//! let doc = HtmlDocument::parse(url, &html);
//! let extraction = ExtractionCoordinator::default_chain().extract(&doc)?;
//!
//! let submission = RecordAssembler::new().assemble(
//!     extraction.record,
//!     cv_bytes,
//!     "resume.pdf",
//!     "application/pdf",
//! )?;
//! let body = submission.job_details_json();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod classifier;
pub mod codec;
pub mod config;
pub mod coordinator;
pub mod document;
pub mod errors;
pub mod extractors;
pub mod observability;
pub mod store;
pub mod submission;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationVerdict, ClassifierRules, TextClassifier};
    pub use crate::codec::{BinaryTextCodec, EncodedBlob, FileSignature, SignatureCheck};
    pub use crate::config::{
        CodecConfig, ExtractionConfig, JobmatchConfig, StoreConfig, SubmissionConfig,
    };
    pub use crate::coordinator::{Extraction, ExtractionCoordinator};
    #[cfg(feature = "html")]
    pub use crate::document::HtmlDocument;
    pub use crate::document::{Document, DocumentNode, FieldLocator, Locator};
    pub use crate::errors::{
        DecodingError, EncodingError, ExtractionError, JobmatchError, RecoveryHint, StoreError,
        ValidationError,
    };
    pub use crate::extractors::{
        GenericExtractor, JobDetails, JobRecord, JobsDbExtractor, SiteExtractor, SiteProfile,
    };
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::store::{
        BufferSource, ByteSource, CvLibrary, CvStatistics, FileByteSource, KeyValueStore,
        MemoryStore, StoredCv,
    };
    pub use crate::submission::{EnrichedSubmission, RecordAssembler};
    pub use crate::utils::{Clock, FixedClock, SystemClock, Timestamp};
}
