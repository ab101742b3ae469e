//! `scraper`-backed [`Document`] implementation.

use scraper::{ElementRef, Html, Selector};

use super::{Document, DocumentNode, Locator, LocatorError, NodeHandle};

/// An HTML page parsed with `scraper`.
#[derive(Debug)]
pub struct HtmlDocument {
    url: String,
    html: Html,
}

impl HtmlDocument {
    /// Parses a complete HTML document.
    #[must_use]
    pub fn parse(url: impl Into<String>, source: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(source),
        }
    }
}

fn parse_selector(locator: &Locator) -> Result<Selector, LocatorError> {
    Selector::parse(locator.selector()).map_err(|e| LocatorError::InvalidSelector {
        selector: locator.selector().to_string(),
        reason: e.to_string(),
    })
}

impl Document for HtmlDocument {
    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> Option<String> {
        let selector = parse_selector(&Locator::css("title")).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn root(&self) -> NodeHandle<'_> {
        Box::new(HtmlNode(self.html.root_element()))
    }
}

/// An element of an [`HtmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(pub ElementRef<'a>);

impl<'a> DocumentNode<'a> for HtmlNode<'a> {
    fn tag_name(&self) -> String {
        self.0.value().name().to_ascii_lowercase()
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }

    fn parent(&self) -> Option<NodeHandle<'a>> {
        self.0
            .parent()
            .and_then(ElementRef::wrap)
            .map(|el| Box::new(HtmlNode(el)) as NodeHandle<'a>)
    }

    fn select(&self, locator: &Locator) -> Result<Vec<NodeHandle<'a>>, LocatorError> {
        let selector = parse_selector(locator)?;
        Ok(self
            .0
            .select(&selector)
            .map(|el| Box::new(HtmlNode(el)) as NodeHandle<'a>)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title> Senior Engineer | Acme </title></head>
<body><div class="job"><h1 data-marker="title">Senior Engineer</h1>
<ul><li>One</li><li>Two</li></ul></div></body></html>"#;

    #[test]
    fn test_title_is_trimmed() {
        let doc = HtmlDocument::parse("https://example.com/job/1", PAGE);
        assert_eq!(doc.title().as_deref(), Some("Senior Engineer | Acme"));
        assert_eq!(doc.url(), "https://example.com/job/1");
    }

    #[test]
    fn test_missing_title_is_none() {
        let doc = HtmlDocument::parse("about:blank", "<html><body></body></html>");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_select_and_parent() {
        let doc = HtmlDocument::parse("about:blank", PAGE);
        let root = doc.root();
        let items = root.select(&Locator::css("li")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text(), "Two");

        let parent = items[0].parent().unwrap();
        assert_eq!(parent.tag_name(), "ul");
    }

    #[test]
    fn test_attr() {
        let doc = HtmlDocument::parse("about:blank", PAGE);
        let h1 = doc.root().select_first(&Locator::css("h1")).unwrap().unwrap();
        assert_eq!(h1.attr("data-marker").as_deref(), Some("title"));
        assert_eq!(h1.attr("missing"), None);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let doc = HtmlDocument::parse("about:blank", PAGE);
        let Err(err) = doc.root().select(&Locator::css("h1[")) else {
            panic!("malformed selector was accepted");
        };
        assert!(matches!(err, LocatorError::InvalidSelector { .. }));
    }
}
