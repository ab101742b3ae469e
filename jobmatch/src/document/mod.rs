//! Read-only document abstraction used by the extractors.
//!
//! Extractors never touch a parser directly. They walk a [`Document`] through
//! [`DocumentNode`] handles and address nodes with [`Locator`]s, which keeps
//! them usable against any tree a host can provide.

#[cfg(feature = "html")]
mod html;
pub mod locator;

use std::fmt;
use thiserror::Error;

#[cfg(feature = "html")]
pub use html::{HtmlDocument, HtmlNode};
pub use locator::{locate, FieldLocator};

/// A boxed node handle borrowed from its document.
pub type NodeHandle<'a> = Box<dyn DocumentNode<'a> + 'a>;

/// Addresses nodes in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
}

impl Locator {
    /// Creates a CSS selector locator. The selector is parsed lazily; a
    /// malformed selector only fails when it is used.
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// Returns the selector source.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Builds a locator list from selector strings.
    #[must_use]
    pub fn list<I, S>(selectors: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        selectors.into_iter().map(Self::css).collect()
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Self::css(selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)
    }
}

/// A locator could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// The selector does not parse.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector source.
        selector: String,
        /// Parser message.
        reason: String,
    },
}

/// A node in a read-only document tree.
pub trait DocumentNode<'a> {
    /// Lower-case element name.
    fn tag_name(&self) -> String;

    /// Concatenated text of this node and its descendants, untrimmed.
    fn text(&self) -> String;

    /// Attribute value.
    fn attr(&self, name: &str) -> Option<String>;

    /// The parent element, if any.
    fn parent(&self) -> Option<NodeHandle<'a>>;

    /// All descendants matching `locator`, in document order.
    fn select(&self, locator: &Locator) -> Result<Vec<NodeHandle<'a>>, LocatorError>;

    /// First descendant matching `locator`.
    fn select_first(&self, locator: &Locator) -> Result<Option<NodeHandle<'a>>, LocatorError> {
        Ok(self.select(locator)?.into_iter().next())
    }
}

/// A parsed page.
pub trait Document {
    /// The page URL.
    fn url(&self) -> &str;

    /// The `<title>` text, trimmed; `None` when absent or blank.
    fn title(&self) -> Option<String>;

    /// The root element.
    fn root(&self) -> NodeHandle<'_>;

    /// Full page text.
    fn text(&self) -> String {
        self.root().text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_list_preserves_order() {
        let list = Locator::list(["h1.title", "h1"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].selector(), "h1.title");
        assert_eq!(list[1].to_string(), "h1");
    }

    #[test]
    fn test_locator_from_str() {
        let locator: Locator = "[data-automation=\"job-detail-title\"]".into();
        assert_eq!(locator, Locator::css("[data-automation=\"job-detail-title\"]"));
    }
}
