//! Priority-ordered extraction chain.
//!
//! The coordinator asks each strategy in turn whether it recognises the page
//! and returns the first adequate record. Strategy failures are logged and
//! demoted to "try the next one"; only exhaustion surfaces to the caller.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ExtractionConfig;
use crate::document::Document;
use crate::errors::ExtractionError;
use crate::extractors::{GenericExtractor, JobRecord, JobsDbExtractor, SiteExtractor, SiteProfile};
use crate::observability::SpanTimer;
use crate::utils::{Clock, SystemClock};

/// A successful extraction and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// The extracted record.
    pub record: JobRecord,
    /// Name of the winning strategy.
    pub strategy: String,
}

/// Runs extraction strategies in priority order.
pub struct ExtractionCoordinator {
    strategies: Vec<Box<dyn SiteExtractor>>,
}

impl std::fmt::Debug for ExtractionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionCoordinator")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::default_chain()
    }
}

impl ExtractionCoordinator {
    /// Creates a coordinator over `strategies`, most specific first.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn SiteExtractor>>) -> Self {
        Self { strategies }
    }

    /// The standard chain: JobsDB, then the generic fallback.
    #[must_use]
    pub fn default_chain() -> Self {
        Self::with_config(&ExtractionConfig::default(), Arc::new(SystemClock))
    }

    /// The standard chain built from `config`, stamping records with `clock`.
    #[must_use]
    pub fn with_config(config: &ExtractionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(vec![
            Box::new(
                JobsDbExtractor::with_profile(SiteProfile::jobsdb(), config.clone())
                    .with_clock(clock.clone()),
            ),
            Box::new(GenericExtractor::with_config(config.clone()).with_clock(clock)),
        ])
    }

    /// Appends a strategy at the lowest priority.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn SiteExtractor>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Strategy names in priority order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Whether any strategy recognises the page.
    #[must_use]
    pub fn is_any_valid(&self, doc: &dyn Document) -> bool {
        self.strategies.iter().any(|s| s.is_valid_page(doc))
    }

    /// Extracts a record with the first strategy that recognises the page and
    /// produces an adequate record.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Exhausted`] carrying the last strategy
    /// error when no strategy succeeds.
    pub fn extract(&self, doc: &dyn Document) -> Result<Extraction, ExtractionError> {
        let timer = SpanTimer::start("extraction");
        let mut last_error = None;

        for strategy in &self.strategies {
            if !strategy.is_valid_page(doc) {
                continue;
            }

            match strategy.extract_all(doc) {
                Ok(record) => {
                    info!(
                        strategy = strategy.name(),
                        url = doc.url(),
                        duration_ms = timer.elapsed_ms(),
                        "Extraction succeeded"
                    );
                    return Ok(Extraction {
                        record,
                        strategy: strategy.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Strategy failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        let err = ExtractionError::exhausted(last_error);
        warn!(
            url = doc.url(),
            strategies = self.strategies.len(),
            duration_ms = timer.finish(),
            error = %err,
            "No strategy could extract the page"
        );
        Err(err)
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;
    use crate::extractors::JobDetails;
    use crate::utils::FixedClock;
    use chrono::{TimeZone, Utc};

    const PAGE: &str = r#"<html><body>
<h1 data-automation="job-detail-title">Payroll Officer</h1>
<div data-automation="jobAdDetails"><ul>
<li>Prepare the monthly payroll</li>
<li>Minimum 2 years of payroll experience</li>
</ul></div>
</body></html>"#;

    fn pinned() -> ExtractionCoordinator {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ExtractionCoordinator::with_config(&ExtractionConfig::default(), Arc::new(FixedClock::new(at)))
    }

    /// Always fails as inadequate on pages it accepts.
    struct Refusing;

    impl SiteExtractor for Refusing {
        fn name(&self) -> &str {
            "Refusing"
        }
        fn is_valid_page(&self, _doc: &dyn Document) -> bool {
            true
        }
        fn extract_title(&self, _doc: &dyn Document) -> Option<String> {
            None
        }
        fn extract_company(&self, _doc: &dyn Document) -> Option<String> {
            None
        }
        fn extract_responsibilities(&self, _doc: &dyn Document) -> Vec<String> {
            Vec::new()
        }
        fn extract_requirements(&self, _doc: &dyn Document) -> Vec<String> {
            Vec::new()
        }
        fn extract_details(&self, doc: &dyn Document) -> JobDetails {
            JobDetails::new(doc.url(), Utc::now())
        }
    }

    #[test]
    fn test_default_chain_order() {
        let coordinator = ExtractionCoordinator::default_chain();
        assert_eq!(coordinator.strategy_names(), vec!["JobsDB", "Generic"]);
    }

    #[test]
    fn test_site_specific_strategy_wins() {
        let doc = HtmlDocument::parse("https://hk.jobsdb.com/job/1", PAGE);
        let extraction = pinned().extract(&doc).unwrap();

        assert_eq!(extraction.strategy, "JobsDB");
        assert_eq!(extraction.record.title.as_deref(), Some("Payroll Officer"));
        assert_eq!(extraction.record.responsibilities, vec!["Prepare the monthly payroll"]);
        assert_eq!(
            extraction.record.requirements,
            vec!["Minimum 2 years of payroll experience"]
        );
    }

    #[test]
    fn test_falls_back_to_generic() {
        let doc = HtmlDocument::parse("https://example.com/careers/payroll", PAGE);
        let extraction = pinned().extract(&doc).unwrap();

        assert_eq!(extraction.strategy, "Generic");
        assert_eq!(extraction.record.title.as_deref(), Some("Payroll Officer"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = HtmlDocument::parse("https://hk.jobsdb.com/job/1", PAGE);
        let coordinator = pinned();

        assert_eq!(coordinator.extract(&doc).unwrap(), coordinator.extract(&doc).unwrap());
    }

    #[test]
    fn test_empty_document_exhausts_chain() {
        let doc = HtmlDocument::parse("about:blank", "");
        let coordinator = ExtractionCoordinator::default_chain();

        assert!(!coordinator.is_any_valid(&doc));
        let err = coordinator.extract(&doc).unwrap_err();
        assert_eq!(err, ExtractionError::exhausted(None));
        assert_eq!(err.to_string(), "No extractor could process this page");
    }

    #[test]
    fn test_strategy_errors_are_demoted() {
        let doc = HtmlDocument::parse("https://example.com/jobs/1", PAGE);
        let coordinator = ExtractionCoordinator::new(vec![Box::new(Refusing)])
            .with_strategy(Box::new(GenericExtractor::new()));

        let extraction = coordinator.extract(&doc).unwrap();
        assert_eq!(extraction.strategy, "Generic");
    }

    #[test]
    fn test_exhaustion_reports_last_error() {
        let doc = HtmlDocument::parse("about:blank", "<html><body></body></html>");
        let coordinator = ExtractionCoordinator::new(vec![Box::new(Refusing)]);

        let err = coordinator.extract(&doc).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::exhausted(Some(ExtractionError::inadequate("Refusing")))
        );
    }
}
