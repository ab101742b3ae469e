//! Fallback extractor for arbitrary job sites.

use std::sync::Arc;
use tracing::debug;

use super::sections::{Heuristics, SectionKind};
use super::{JobDetails, SiteExtractor};
use crate::classifier::TextClassifier;
use crate::config::ExtractionConfig;
use crate::document::{Document, FieldLocator};
use crate::utils::{char_len, Clock, SystemClock};

const URL_KEYWORDS: &[&str] = &[
    "job",
    "jobs",
    "career",
    "careers",
    "position",
    "vacancy",
    "employment",
    "hire",
    "hiring",
    "職位",
    "工作",
    "招聘",
];

const CONTENT_KEYWORDS: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "experience",
    "skills",
    "salary",
    "benefits",
    "職責",
    "要求",
    "資格",
    "經驗",
    "技能",
    "薪資",
    "福利",
];

/// Heuristic extractor for pages no site-specific strategy recognises.
#[derive(Debug, Clone)]
pub struct GenericExtractor {
    heuristics: Heuristics,
    clock: Arc<dyn Clock>,
    title: FieldLocator,
    headings: FieldLocator,
    company: FieldLocator,
    company_meta: FieldLocator,
    description: FieldLocator,
    salary: FieldLocator,
    location: FieldLocator,
    job_type: FieldLocator,
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericExtractor {
    /// Creates a generic extractor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Creates a generic extractor.
    #[must_use]
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            heuristics: Heuristics::new(config),
            clock: Arc::new(SystemClock),
            title: FieldLocator::new([
                r#"h1[data-automation="job-detail-title"]"#,
                "h1.job-title",
                r#"h1[class*="title"]"#,
                r#"h1[class*="job"]"#,
                ".job-title h1",
                ".position-title h1",
                "h1:first-of-type",
                "h1",
            ]),
            headings: FieldLocator::new(["h1, h2, h3"]),
            company: FieldLocator::new([
                r#"[data-automation="job-detail-company-name"]"#,
                ".company-name",
                ".employer-name",
                r#"[class*="company"]"#,
                r#"[class*="employer"]"#,
                "h2:first-of-type",
                "h2",
            ]),
            company_meta: FieldLocator::new([
                r#"meta[property*="site_name"]"#,
                r#"meta[name*="author"]"#,
            ]),
            description: FieldLocator::new([
                r#"[data-automation="job-detail-description"]"#,
                ".job-description",
                ".job-details",
                ".position-description",
                r#"[class*="description"]"#,
                r#"[class*="detail"]"#,
                "main",
                ".content",
                "article",
            ]),
            salary: FieldLocator::new([
                r#"[data-automation="job-detail-salary"]"#,
                ".salary",
                ".compensation",
                ".pay-range",
                r#"[class*="salary"]"#,
                r#"[class*="compensation"]"#,
            ]),
            location: FieldLocator::new([
                r#"[data-automation="job-detail-location"]"#,
                ".location",
                ".job-location",
                ".address",
                r#"[class*="location"]"#,
                r#"[class*="address"]"#,
            ]),
            job_type: FieldLocator::new([
                r#"[data-automation="job-detail-work-type"]"#,
                ".job-type",
                ".employment-type",
                ".work-type",
                r#"[class*="job-type"]"#,
                r#"[class*="employment"]"#,
            ]),
        }
    }

    /// Replaces the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: TextClassifier) -> Self {
        self.heuristics = self.heuristics.with_classifier(classifier);
        self
    }

    /// Replaces the clock used to stamp extractions.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn title_from_headings(&self, doc: &dyn Document) -> Option<String> {
        self.headings
            .locate_all(doc.root().as_ref())
            .into_iter()
            .find(|text| (6..100).contains(&char_len(text)))
    }

    fn company_from_meta(&self, doc: &dyn Document) -> Option<String> {
        self.company_meta
            .locate_attr(doc.root().as_ref(), "content")
            .filter(|content| char_len(content) < 50)
    }
}

impl SiteExtractor for GenericExtractor {
    fn name(&self) -> &str {
        "Generic"
    }

    fn is_valid_page(&self, doc: &dyn Document) -> bool {
        let url = doc.url().to_lowercase();
        let url_hit = URL_KEYWORDS.iter().any(|k| url.contains(k));
        let title_hit = self.title.locate(doc.root().as_ref()).is_some();
        let content_hit = !url_hit && !title_hit && {
            let text = doc.text().to_lowercase();
            CONTENT_KEYWORDS.iter().any(|k| text.contains(k))
        };

        debug!(
            extractor = self.name(),
            url = doc.url(),
            url_hit,
            title_hit,
            content_hit,
            "Page validation"
        );
        url_hit || title_hit || content_hit
    }

    fn extract_title(&self, doc: &dyn Document) -> Option<String> {
        self.title
            .locate(doc.root().as_ref())
            .or_else(|| self.heuristics.title_from_page(doc))
            .or_else(|| self.title_from_headings(doc))
    }

    fn extract_company(&self, doc: &dyn Document) -> Option<String> {
        self.company
            .locate(doc.root().as_ref())
            .and_then(|raw| self.heuristics.clean_company(&raw))
            .or_else(|| {
                self.company_from_meta(doc)
                    .and_then(|raw| self.heuristics.clean_company(&raw))
            })
    }

    fn extract_responsibilities(&self, doc: &dyn Document) -> Vec<String> {
        self.heuristics
            .harvest(doc, &self.description, SectionKind::Responsibilities)
    }

    fn extract_requirements(&self, doc: &dyn Document) -> Vec<String> {
        self.heuristics
            .harvest(doc, &self.description, SectionKind::Requirements)
    }

    fn extract_details(&self, doc: &dyn Document) -> JobDetails {
        let root = doc.root();
        JobDetails {
            salary: self.salary.locate(root.as_ref()),
            location: self.location.locate(root.as_ref()),
            job_type: self.job_type.locate(root.as_ref()),
            page_title: doc.title(),
            ..JobDetails::new(doc.url(), self.clock.now())
        }
    }
}
