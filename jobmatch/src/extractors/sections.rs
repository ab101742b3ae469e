//! Heuristics shared by every extractor: section harvesting, the three-tier
//! list fallback, company cleanup and the title fallbacks.

use regex::Regex;
use tracing::debug;

use crate::classifier::{
    compile, TextClassifier, REQUIREMENT_SECTION_KEYWORDS, RESPONSIBILITY_SECTION_KEYWORDS,
};
use crate::config::ExtractionConfig;
use crate::document::{Document, DocumentNode, FieldLocator, Locator, NodeHandle};
use crate::utils::{char_len, collapse_whitespace, dedup_preserving_order, truncate_chars};

/// Elements that can carry a section heading.
const HEADING_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "strong", "b", "p", "span", "div", "dt", "th", "label",
];

const COMPANY_SUFFIX: &str =
    r"\s*\b(?:View all jobs|Show all|See more|Show more|Quick apply|Save)\b.*$";

/// Which list a harvest is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Responsibilities.
    Responsibilities,
    /// Requirements.
    Requirements,
}

impl SectionKind {
    /// Heading keywords for this kind of section.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Responsibilities => RESPONSIBILITY_SECTION_KEYWORDS,
            Self::Requirements => REQUIREMENT_SECTION_KEYWORDS,
        }
    }

    fn accepts(self, classifier: &TextClassifier, text: &str) -> bool {
        match self {
            Self::Responsibilities => classifier.is_responsibility(text),
            Self::Requirements => classifier.is_requirement(text),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Responsibilities => "responsibilities",
            Self::Requirements => "requirements",
        }
    }
}

/// Shared extraction heuristics, owned by each extractor.
#[derive(Debug, Clone)]
pub(crate) struct Heuristics {
    classifier: TextClassifier,
    config: ExtractionConfig,
    company_suffix: Option<Regex>,
    body: FieldLocator,
    list_items: Locator,
    blocks: Locator,
    any: Locator,
}

impl Heuristics {
    pub(crate) fn new(config: ExtractionConfig) -> Self {
        Self {
            classifier: TextClassifier::from_config(&config),
            config,
            company_suffix: compile("company_suffix", COMPANY_SUFFIX),
            body: FieldLocator::new(["body"]),
            list_items: Locator::css("ul li, ol li"),
            blocks: Locator::css("p, div"),
            any: Locator::css("*"),
        }
    }

    pub(crate) fn with_classifier(mut self, classifier: TextClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Collects one list with the three-tier fallback. Without a description
    /// container the page body stands in for it.
    pub(crate) fn harvest(
        &self,
        doc: &dyn Document,
        description: &FieldLocator,
        kind: SectionKind,
    ) -> Vec<String> {
        let root = doc.root();
        let container = description
            .locate_node(root.as_ref())
            .or_else(|| self.body.locate_node(root.as_ref()))
            .unwrap_or(root);

        let mut tier = 1;
        let mut found = self
            .find_section(container.as_ref(), kind)
            .map(|section| self.section_items(section.as_ref(), kind))
            .unwrap_or_default();

        if found.is_empty() {
            tier = 2;
            found = self
                .select(container.as_ref(), &self.list_items)
                .iter()
                .map(|li| collapse_whitespace(&li.text()))
                .filter(|item| kind.accepts(&self.classifier, item))
                .collect();
        }

        if found.is_empty() {
            tier = 3;
            found = split_lines(&container.text())
                .into_iter()
                .filter(|line| kind.accepts(&self.classifier, line))
                .collect();
        }

        let items = dedup_preserving_order(found, self.config.max_items);
        debug!(
            kind = kind.label(),
            tier,
            count = items.len(),
            first = items.first().map(|s| truncate_chars(s, 80)).unwrap_or_default(),
            "Harvested items"
        );
        items
    }

    /// Finds the element enclosing a section whose heading mentions one of
    /// the kind's keywords.
    fn find_section<'a>(
        &self,
        container: &dyn DocumentNode<'a>,
        kind: SectionKind,
    ) -> Option<NodeHandle<'a>> {
        let heading = self.select(container, &self.any).into_iter().find(|node| {
            if !HEADING_TAGS.contains(&node.tag_name().as_str()) {
                return false;
            }
            let text = collapse_whitespace(&node.text()).to_lowercase();
            !text.is_empty()
                && char_len(&text) <= self.config.section_heading_max_chars
                && kind.keywords().iter().any(|k| text.contains(&k.to_lowercase()))
        })?;
        Some(heading.parent().unwrap_or(heading))
    }

    /// Accepted list items inside `section`; paragraph text split on bullets
    /// when it has no lists. The section cap counts accepted items only, so a
    /// heading whose parent also holds other sections keeps its own entries.
    fn section_items(&self, section: &dyn DocumentNode<'_>, kind: SectionKind) -> Vec<String> {
        let mut items: Vec<String> = self
            .select(section, &self.list_items)
            .iter()
            .map(|li| collapse_whitespace(&li.text()))
            .filter(|text| char_len(text) > 5)
            .collect();

        if items.is_empty() {
            for block in self.select(section, &self.blocks) {
                let text = block.text();
                if char_len(text.trim()) <= 10 {
                    continue;
                }
                items.extend(
                    text.split(['•', '·', '\n', '\r'])
                        .map(collapse_whitespace)
                        .filter(|piece| char_len(piece) > 5),
                );
            }
        }

        items.retain(|item| kind.accepts(&self.classifier, item));
        items.truncate(self.config.max_section_items);
        items
    }

    fn select<'a>(&self, node: &dyn DocumentNode<'a>, locator: &Locator) -> Vec<NodeHandle<'a>> {
        node.select(locator).unwrap_or_default()
    }

    /// Strips trailing UI labels and rejects brand names and implausible
    /// lengths.
    pub(crate) fn clean_company(&self, raw: &str) -> Option<String> {
        let collapsed = collapse_whitespace(raw);
        let cleaned = match &self.company_suffix {
            Some(re) => re.replace(&collapsed, "").trim().to_string(),
            None => collapsed,
        };
        let len = char_len(&cleaned);
        if len < self.config.company_min_chars
            || len >= self.config.company_max_chars
            || self.config.mentions_brand(&cleaned)
        {
            debug!(company = %cleaned, "Rejected company candidate");
            return None;
        }
        Some(cleaned)
    }

    /// The document title when it is short enough to pass as a job title.
    pub(crate) fn title_from_page(&self, doc: &dyn Document) -> Option<String> {
        doc.title()
            .filter(|t| char_len(t) < self.config.page_title_max_chars)
    }
}

/// Splits free text on line breaks, bullet glyphs and spaced dashes. Leading
/// list markers are dropped from each line.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r', '•', '·', '*'])
        .flat_map(|line| line.split(" - ").flat_map(|part| part.split(" – ")))
        .map(|line| line.trim().trim_start_matches(['-', '–']).trim())
        .filter(|line| !line.is_empty())
        .map(collapse_whitespace)
        .collect()
}
