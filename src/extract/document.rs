//! Minimal document query capability.
//!
//! The extractor only needs to select elements by rule and read their text or
//! attributes. [`DocumentQuery`] captures exactly that, so extraction can run
//! against a parsed [`HtmlDocument`] or a synthetic document in tests.

use scraper::{ElementRef, Html, Selector};

/// Which element a [`Rule`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The matched element itself.
    Matched,
    /// The parent element of the match.
    Parent,
}

/// A CSS selector plus the element it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub selector: &'static str,
    pub target: Target,
}

impl Rule {
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self {
            selector,
            target: Target::Matched,
        }
    }

    #[must_use]
    pub const fn parent_of(selector: &'static str) -> Self {
        Self {
            selector,
            target: Target::Parent,
        }
    }
}

/// Read-only queries over a document.
pub trait DocumentQuery {
    /// Whether any element matches `rule`.
    fn exists(&self, rule: Rule) -> bool;

    /// Trimmed text of the first element matching `rule`.
    fn text(&self, rule: Rule) -> Option<String>;

    /// Trimmed text of every element matching `rule`, in document order.
    fn texts(&self, rule: Rule) -> Vec<String>;

    /// Attribute value of the first element matching `rule`.
    fn attr(&self, rule: Rule, name: &str) -> Option<String>;
}

/// A parsed HTML document backed by `scraper`.
///
/// Not `Send`: parse, query and drop it without crossing an `.await`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    fn elements(&self, rule: Rule) -> Vec<ElementRef<'_>> {
        let Ok(selector) = Selector::parse(rule.selector) else {
            tracing::warn!("Invalid selector: {}", rule.selector);
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter_map(|el| match rule.target {
                Target::Matched => Some(el),
                Target::Parent => el.parent().and_then(ElementRef::wrap),
            })
            .collect()
    }

    fn first(&self, rule: Rule) -> Option<ElementRef<'_>> {
        self.elements(rule).into_iter().next()
    }
}

impl DocumentQuery for HtmlDocument {
    fn exists(&self, rule: Rule) -> bool {
        self.first(rule).is_some()
    }

    fn text(&self, rule: Rule) -> Option<String> {
        self.first(rule).map(|el| collect_text(el).trim().to_string())
    }

    fn texts(&self, rule: Rule) -> Vec<String> {
        self.elements(rule)
            .into_iter()
            .map(|el| collect_text(el).trim().to_string())
            .collect()
    }

    fn attr(&self, rule: Rule, name: &str) -> Option<String> {
        self.first(rule)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }
}

fn collect_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
