//! Site-specific extractor for JobsDB job pages.
//!
//! The site is described by a [`SiteProfile`]: where job pages live and which
//! locators address each field. The default profile targets JobsDB's
//! `data-automation` attributes; other sites with stable markup can reuse the
//! extractor with their own profile.

use std::sync::Arc;
use tracing::debug;

use super::sections::{Heuristics, SectionKind};
use super::{split_url, JobDetails, SiteExtractor};
use crate::classifier::TextClassifier;
use crate::config::ExtractionConfig;
use crate::document::{Document, FieldLocator};
use crate::utils::{Clock, SystemClock};

/// Where a site's job pages live and how their fields are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    /// Strategy name.
    pub name: String,
    /// Host fragment identifying the site, e.g. `jobsdb.com`.
    pub domain: String,
    /// Path fragment identifying a job page, e.g. `/job/`.
    pub job_path: String,
    /// Job title locators.
    pub title: FieldLocator,
    /// Company name locators.
    pub company: FieldLocator,
    /// Description container locators.
    pub description: FieldLocator,
    /// Salary locators.
    pub salary: FieldLocator,
    /// Location locators.
    pub location: FieldLocator,
    /// Employment type locators.
    pub job_type: FieldLocator,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::jobsdb()
    }
}

impl SiteProfile {
    /// The JobsDB profile.
    #[must_use]
    pub fn jobsdb() -> Self {
        Self {
            name: "JobsDB".to_string(),
            domain: "jobsdb.com".to_string(),
            job_path: "/job/".to_string(),
            title: FieldLocator::new([r#"h1[data-automation="job-detail-title"]"#]),
            company: FieldLocator::new([r#"[data-automation="job-detail-company-name"]"#]),
            description: FieldLocator::new([
                r#"[data-automation="jobAdDetails"]"#,
                r#"[data-automation="job-detail-description"]"#,
                r#"[class*="job-description"]"#,
                r#"[id*="job-description"]"#,
            ]),
            salary: FieldLocator::new([r#"[data-automation="job-detail-salary"]"#]),
            location: FieldLocator::new([r#"[data-automation="job-detail-location"]"#]),
            job_type: FieldLocator::new([r#"[data-automation="job-detail-work-type"]"#]),
        }
    }

    /// Sets the strategy name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the site domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets the job path fragment.
    #[must_use]
    pub fn with_job_path(mut self, job_path: impl Into<String>) -> Self {
        self.job_path = job_path.into();
        self
    }

    /// Replaces the title locators.
    #[must_use]
    pub fn with_title(mut self, title: FieldLocator) -> Self {
        self.title = title;
        self
    }

    /// Replaces the company locators.
    #[must_use]
    pub fn with_company(mut self, company: FieldLocator) -> Self {
        self.company = company;
        self
    }

    /// Replaces the description container locators.
    #[must_use]
    pub fn with_description(mut self, description: FieldLocator) -> Self {
        self.description = description;
        self
    }
}

/// Extractor for a single site with known markup.
#[derive(Debug, Clone)]
pub struct JobsDbExtractor {
    profile: SiteProfile,
    heuristics: Heuristics,
    clock: Arc<dyn Clock>,
}

impl Default for JobsDbExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JobsDbExtractor {
    /// Creates an extractor for JobsDB with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(SiteProfile::jobsdb(), ExtractionConfig::default())
    }

    /// Creates an extractor for the site described by `profile`.
    #[must_use]
    pub fn with_profile(profile: SiteProfile, config: ExtractionConfig) -> Self {
        Self {
            profile,
            heuristics: Heuristics::new(config),
            clock: Arc::new(SystemClock),
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

    /// The site profile.
    #[must_use]
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }
}

impl SiteExtractor for JobsDbExtractor {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn is_valid_page(&self, doc: &dyn Document) -> bool {
        let (host, path) = split_url(doc.url());
        let on_site = host.contains(&self.profile.domain.to_ascii_lowercase());
        let on_job_page = path.contains(&self.profile.job_path);
        let valid = on_site
            && on_job_page
            && self.profile.title.locate(doc.root().as_ref()).is_some();

        debug!(
            extractor = self.name(),
            url = doc.url(),
            on_site,
            on_job_page,
            valid,
            "Page validation"
        );
        valid
    }

    fn extract_title(&self, doc: &dyn Document) -> Option<String> {
        self.profile
            .title
            .locate(doc.root().as_ref())
            .or_else(|| self.heuristics.title_from_page(doc))
    }

    fn extract_company(&self, doc: &dyn Document) -> Option<String> {
        self.profile
            .company
            .locate(doc.root().as_ref())
            .and_then(|raw| self.heuristics.clean_company(&raw))
    }

    fn extract_responsibilities(&self, doc: &dyn Document) -> Vec<String> {
        self.heuristics
            .harvest(doc, &self.profile.description, SectionKind::Responsibilities)
    }

    fn extract_requirements(&self, doc: &dyn Document) -> Vec<String> {
        self.heuristics
            .harvest(doc, &self.profile.description, SectionKind::Requirements)
    }

    fn extract_details(&self, doc: &dyn Document) -> JobDetails {
        let root = doc.root();
        JobDetails {
            salary: self.profile.salary.locate(root.as_ref()),
            location: self.profile.location.locate(root.as_ref()),
            job_type: self.profile.job_type.locate(root.as_ref()),
            ..JobDetails::new(doc.url(), self.clock.now())
        }
    }
}
