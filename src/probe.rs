//! DOM probes
//!
//! A probe is a single DOM query against a loaded page. Probes are described
//! by [`Predicate`] values (data, not code) and compiled to JavaScript count
//! expressions evaluated via Runtime.evaluate.
//!
//! Predicates are deliberately loose (substring and keyword matches,
//! disjunctive structural patterns) so minor markup changes on the target
//! don't produce false negatives.

use serde_json::Value;

/// Expression reading the document title
pub const TITLE_SCRIPT: &str = "document.title";

/// A loose DOM predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Elements with the given tag name
    Tag(String),
    /// Anchors, buttons, or any element whose class attribute contains the
    /// marker
    NavigationLike {
        /// Class-attribute marker (e.g., "nav")
        class_marker: String,
    },
    /// Elements whose text content contains any of the keywords
    TextContainsAny(Vec<String>),
}

impl Predicate {
    /// Compile the predicate to a JavaScript expression returning the number
    /// of matching elements
    pub fn count_script(&self) -> String {
        match self {
            Predicate::Tag(tag) => {
                format!("document.getElementsByTagName({}).length", js_string(tag))
            }
            Predicate::NavigationLike { class_marker } => {
                let xpath = format!("//a | //button | //*[contains(@class,'{}')]", class_marker);
                xpath_count_script(&xpath)
            }
            Predicate::TextContainsAny(keywords) => {
                let xpath = keywords
                    .iter()
                    .map(|k| format!("//*[contains(text(),'{}')]", k))
                    .collect::<Vec<_>>()
                    .join(" | ");
                xpath_count_script(&xpath)
            }
        }
    }

    /// Human-readable description for assertion messages
    pub fn describe(&self) -> String {
        match self {
            Predicate::Tag(tag) => format!("<{}> elements", tag),
            Predicate::NavigationLike { class_marker } => {
                format!("navigation elements (a, button, or class containing '{}')", class_marker)
            }
            Predicate::TextContainsAny(keywords) => {
                format!("elements with text containing any of {:?}", keywords)
            }
        }
    }
}

/// Count XPath matches with an ordered snapshot
fn xpath_count_script(xpath: &str) -> String {
    format!(
        "document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength",
        js_string(xpath)
    )
}

/// Encode a Rust string as a JavaScript string literal
fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
