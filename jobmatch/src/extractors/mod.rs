//! Site extractors turning a job-posting document into a [`JobRecord`].
//!
//! Each extractor is a strategy behind the [`SiteExtractor`] trait. The
//! coordinator walks them in priority order; the site-specific
//! [`JobsDbExtractor`] goes first and the [`GenericExtractor`] catches the
//! rest.

mod generic;
mod jobsdb;
mod sections;


use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::document::Document;
use crate::errors::ExtractionError;
use crate::utils::Timestamp;

pub use generic::GenericExtractor;
pub use jobsdb::{JobsDbExtractor, SiteProfile};
pub use sections::SectionKind;

/// Page metadata captured alongside the job fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    /// Page URL.
    pub url: String,
    /// When extraction ran.
    pub extracted_at: Timestamp,
    /// Salary text, if shown.
    pub salary: Option<String>,
    /// Location text, if shown.
    pub location: Option<String>,
    /// Employment type, if shown.
    pub job_type: Option<String>,
    /// Document title, recorded by the generic extractor.
    pub page_title: Option<String>,
}

impl JobDetails {
    /// Creates details with only the URL and timestamp set.
    #[must_use]
    pub fn new(url: impl Into<String>, extracted_at: Timestamp) -> Self {
        Self {
            url: url.into(),
            extracted_at,
            salary: None,
            location: None,
            job_type: None,
            page_title: None,
        }
    }
}

/// A structured job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job title.
    pub title: Option<String>,
    /// Hiring company.
    pub company: Option<String>,
    /// What the hire will do, in discovery order.
    pub responsibilities: Vec<String>,
    /// What the candidate needs, in discovery order.
    pub requirements: Vec<String>,
    /// Page metadata.
    pub details: JobDetails,
}

fn non_blank(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl JobRecord {
    /// Whether the record carries anything worth sending: a title or
    /// company, or at least one responsibility or requirement.
    #[must_use]
    pub fn is_adequate(&self) -> bool {
        non_blank(self.title.as_ref())
            || non_blank(self.company.as_ref())
            || !self.responsibilities.is_empty()
            || !self.requirements.is_empty()
    }

    /// Converts to a dictionary with the wire field names.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("title".to_string(), serde_json::json!(self.title));
        dict.insert("company".to_string(), serde_json::json!(self.company));
        dict.insert(
            "responsibilities".to_string(),
            serde_json::json!(self.responsibilities),
        );
        dict.insert("requirements".to_string(), serde_json::json!(self.requirements));
        dict.insert(
            "details".to_string(),
            serde_json::to_value(&self.details).unwrap_or(serde_json::Value::Null),
        );
        dict
    }
}

/// A job-posting extraction strategy.
///
/// Implementations are stateless apart from their configuration, so one
/// instance can serve any number of documents.
pub trait SiteExtractor: Send + Sync {
    /// Strategy name, used in logs and in [`crate::coordinator::Extraction`].
    fn name(&self) -> &str;

    /// Whether this strategy recognises the page. Never touches the network.
    fn is_valid_page(&self, doc: &dyn Document) -> bool;

    /// Extracts the job title.
    fn extract_title(&self, doc: &dyn Document) -> Option<String>;

    /// Extracts the company name.
    fn extract_company(&self, doc: &dyn Document) -> Option<String>;

    /// Extracts responsibilities, deduplicated and capped.
    fn extract_responsibilities(&self, doc: &dyn Document) -> Vec<String>;

    /// Extracts requirements, deduplicated and capped.
    fn extract_requirements(&self, doc: &dyn Document) -> Vec<String>;

    /// Extracts page metadata, stamped with the extraction time.
    fn extract_details(&self, doc: &dyn Document) -> JobDetails;

    /// Extracts a complete record.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidPage`] when the strategy does not
    /// recognise the page and [`ExtractionError::Inadequate`] when the record
    /// would be empty.
    fn extract_all(&self, doc: &dyn Document) -> Result<JobRecord, ExtractionError> {
        if !self.is_valid_page(doc) {
            debug!(extractor = self.name(), url = doc.url(), "Page not recognised");
            return Err(ExtractionError::invalid_page(self.name()));
        }

        let record = JobRecord {
            title: self.extract_title(doc),
            company: self.extract_company(doc),
            responsibilities: self.extract_responsibilities(doc),
            requirements: self.extract_requirements(doc),
            details: self.extract_details(doc),
        };

        if !record.is_adequate() {
            return Err(ExtractionError::inadequate(self.name()));
        }

        info!(
            extractor = self.name(),
            title = record.title.as_deref().unwrap_or_default(),
            company = record.company.as_deref().unwrap_or_default(),
            responsibilities = record.responsibilities.len(),
            requirements = record.requirements.len(),
            "Extracted job information"
        );
        Ok(record)
    }
}

/// Splits a URL into host and path without a URL parser. The host is
/// lower-cased; the path keeps its query.
pub(crate) fn split_url(url: &str) -> (String, &str) {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let (host, path) = rest.find('/').map_or((rest, ""), |idx| rest.split_at(idx));
    let host = host.rsplit('@').next().unwrap_or(host);
    (host.to_ascii_lowercase(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn details() -> JobDetails {
        JobDetails::new(
            "https://example.com/job/1",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    fn empty_record() -> JobRecord {
        JobRecord {
            title: None,
            company: None,
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            details: details(),
        }
    }

    #[test]
    fn test_adequacy() {
        let mut record = empty_record();
        assert!(!record.is_adequate());

        record.title = Some("   ".to_string());
        assert!(!record.is_adequate());

        record.requirements.push("SQL".to_string());
        assert!(record.is_adequate());

        let record = JobRecord {
            company: Some("Acme".to_string()),
            ..empty_record()
        };
        assert!(record.is_adequate());
    }

    #[test]
    fn test_details_serialize_camel_case_with_nulls() {
        let json = serde_json::to_value(details()).unwrap();
        assert_eq!(json["url"], "https://example.com/job/1");
        assert_eq!(json["extractedAt"], "2024-05-01T12:00:00Z");
        assert!(json["jobType"].is_null());
        assert!(json["pageTitle"].is_null());
        assert!(json.get("salary").is_some());
    }

    #[test]
    fn test_record_to_dict() {
        let dict = empty_record().to_dict();
        assert!(dict["title"].is_null());
        assert_eq!(dict["details"]["url"], "https://example.com/job/1");
    }

    #[test]
    fn test_split_url() {
        assert_eq!(
            split_url("https://HK.JobsDB.com/job/123?ref=x"),
            ("hk.jobsdb.com".to_string(), "/job/123?ref=x")
        );
        assert_eq!(split_url("example.com"), ("example.com".to_string(), ""));
        assert_eq!(split_url("about:blank"), ("about:blank".to_string(), ""));
    }
}
