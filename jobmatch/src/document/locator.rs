//! Ordered-fallback field lookup.
//!
//! A field is described by a prioritised list of locators. The first locator
//! that yields a node with non-blank text wins. Locators that fail to parse
//! are logged and skipped, so a lookup never fails.

use tracing::debug;

use super::{DocumentNode, Locator, NodeHandle};

/// Returns the trimmed text of the first node matched by `candidates` whose
/// text is non-empty.
#[must_use]
pub fn locate(root: &dyn DocumentNode<'_>, candidates: &[Locator]) -> Option<String> {
    candidates.iter().find_map(|locator| {
        matches(root, locator)
            .into_iter()
            .map(|node| node.text().trim().to_string())
            .find(|text| !text.is_empty())
    })
}

fn matches<'a>(root: &dyn DocumentNode<'a>, locator: &Locator) -> Vec<NodeHandle<'a>> {
    match root.select(locator) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!(locator = %locator, error = %e, "Skipping unusable locator");
            Vec::new()
        }
    }
}

/// A prioritised list of locators for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLocator {
    candidates: Vec<Locator>,
}

impl FieldLocator {
    /// Creates a field locator from selector strings, highest priority first.
    #[must_use]
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: Locator::list(selectors),
        }
    }

    /// Creates a field locator from locators.
    #[must_use]
    pub fn from_locators(candidates: Vec<Locator>) -> Self {
        Self { candidates }
    }

    /// The candidates, highest priority first.
    #[must_use]
    pub fn candidates(&self) -> &[Locator] {
        &self.candidates
    }

    /// Returns a copy with `selector` tried before every existing candidate.
    #[must_use]
    pub fn with_priority(mut self, selector: impl Into<String>) -> Self {
        self.candidates.insert(0, Locator::css(selector));
        self
    }

    /// See [`locate`].
    #[must_use]
    pub fn locate(&self, root: &dyn DocumentNode<'_>) -> Option<String> {
        locate(root, &self.candidates)
    }

    /// Returns the first matched node, regardless of its text.
    #[must_use]
    pub fn locate_node<'a>(&self, root: &dyn DocumentNode<'a>) -> Option<NodeHandle<'a>> {
        self.candidates
            .iter()
            .find_map(|locator| matches(root, locator).into_iter().next())
    }

    /// Returns the first non-blank value of `attr` across all matched nodes.
    #[must_use]
    pub fn locate_attr(&self, root: &dyn DocumentNode<'_>, attr: &str) -> Option<String> {
        self.candidates.iter().find_map(|locator| {
            matches(root, locator)
                .into_iter()
                .filter_map(|node| node.attr(attr))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        })
    }

    /// Returns the trimmed, non-blank texts of every match, candidate by
    /// candidate.
    #[must_use]
    pub fn locate_all(&self, root: &dyn DocumentNode<'_>) -> Vec<String> {
        self.candidates
            .iter()
            .flat_map(|locator| matches(root, locator))
            .map(|node| node.text().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::document::{Document, HtmlDocument};

    const PAGE: &str = r#"<html><head>
<meta property="og:site_name" content="  ">
<meta name="author" content="Acme Holdings">
</head><body>
<h1 class="hero">   </h1>
<h1 data-marker="title">Data Engineer</h1>
<span class="salary">HK$30,000 - HK$40,000</span>
<ul><li>First</li><li> </li><li>Second</li></ul>
</body></html>"#;

    fn doc() -> HtmlDocument {
        HtmlDocument::parse("https://example.com/job/1", PAGE)
    }

    #[test]
    fn test_locate_skips_blank_matches() {
        let doc = doc();
        let found = locate(doc.root().as_ref(), &Locator::list(["h1"]));
        assert_eq!(found.as_deref(), Some("Data Engineer"));
    }

    #[test]
    fn test_locate_respects_priority() {
        let doc = doc();
        let field = FieldLocator::new([".salary", "h1"]);
        assert_eq!(
            field.locate(doc.root().as_ref()).as_deref(),
            Some("HK$30,000 - HK$40,000")
        );
    }

    #[test]
    fn test_locate_none_when_nothing_matches() {
        let doc = doc();
        let field = FieldLocator::new([".company-name", "h3"]);
        assert_eq!(field.locate(doc.root().as_ref()), None);
    }

    #[test]
    fn test_malformed_locator_is_skipped() {
        let doc = doc();
        let field = FieldLocator::new(["h1[", "[data-marker=\"title\"]"]);
        assert_eq!(field.locate(doc.root().as_ref()).as_deref(), Some("Data Engineer"));
    }

    #[test]
    fn test_locate_attr_skips_blank_values() {
        let doc = doc();
        let field = FieldLocator::new(["meta[property*=\"site_name\"]", "meta[name*=\"author\"]"]);
        assert_eq!(
            field.locate_attr(doc.root().as_ref(), "content").as_deref(),
            Some("Acme Holdings")
        );
    }

    #[test]
    fn test_locate_node() {
        let doc = doc();
        let node = FieldLocator::new(["ul"]).locate_node(doc.root().as_ref()).unwrap();
        assert_eq!(node.tag_name(), "ul");
    }

    #[test]
    fn test_locate_all() {
        let doc = doc();
        let field = FieldLocator::new(["li"]);
        assert_eq!(field.locate_all(doc.root().as_ref()), vec!["First", "Second"]);
    }

    #[test]
    fn test_with_priority() {
        let field = FieldLocator::new(["h1"]).with_priority("h1.job-title");
        assert_eq!(field.candidates()[0].selector(), "h1.job-title");
    }
}
