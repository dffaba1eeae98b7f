//! Mock session implementation for testing
//!
//! Answers probe queries from a canned page model and counts acquire/release
//! calls so tests can assert the lifecycle contract: one release per acquire,
//! on every exit path.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::probe::Predicate;
use crate::session::traits::{PageSession, SessionProvider};
use crate::Error;

/// A canned DOM element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Tag name (lowercase)
    pub tag: String,
    /// Class attribute
    pub class: String,
    /// Text content
    pub text: String,
}

impl MockElement {
    /// Create an element with the given tag and empty class/text
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            class: String::new(),
            text: String::new(),
        }
    }

    /// Set the class attribute
    pub fn with_class<S: Into<String>>(mut self, class: S) -> Self {
        self.class = class.into();
        self
    }

    /// Set the text content
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

/// A canned page model evaluated against probe predicates
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    /// Document title
    pub title: String,
    /// Page elements
    pub elements: Vec<MockElement>,
}

impl MockDom {
    /// Create a page model with the given title
    pub fn with_title<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    /// Add an element
    pub fn element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Count elements matching a predicate
    pub fn count(&self, predicate: &Predicate) -> usize {
        self.elements
            .iter()
            .filter(|el| Self::matches(el, predicate))
            .count()
    }

    fn matches(el: &MockElement, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Tag(tag) => el.tag.eq_ignore_ascii_case(tag),
            Predicate::NavigationLike { class_marker } => {
                el.tag == "a" || el.tag == "button" || el.class.contains(class_marker.as_str())
            }
            Predicate::TextContainsAny(keywords) => {
                keywords.iter().any(|k| el.text.contains(k.as_str()))
            }
        }
    }
}

/// Lifecycle counters shared between a provider and its sessions
#[derive(Debug, Default)]
struct SessionCounters {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Mock session provider
///
/// Hands out sessions over a fixed page model and records lifecycle calls.
#[derive(Debug)]
pub struct MockSessionProvider {
    dom: MockDom,
    counters: Arc<SessionCounters>,
    fail_acquire: AtomicBool,
}

impl MockSessionProvider {
    /// Create a provider serving the given page model
    pub fn new(dom: MockDom) -> Self {
        Self {
            dom,
            counters: Arc::new(SessionCounters::default()),
            fail_acquire: AtomicBool::new(false),
        }
    }

    /// Make every subsequent acquisition fail with a setup error
    pub fn fail_acquisitions(&self) {
        self.fail_acquire.store(true, Ordering::SeqCst);
    }

    /// Number of sessions acquired so far
    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    /// Number of sessions released so far
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, Error> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(Error::setup("mock acquisition failure"));
        }

        self.counters.acquired.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockPageSession {
            id: Uuid::new_v4().to_string(),
            dom: self.dom.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Mock page session over a canned page model
#[derive(Debug)]
pub struct MockPageSession {
    id: String,
    dom: MockDom,
    counters: Arc<SessionCounters>,
}

#[async_trait]
impl PageSession for MockPageSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn title(&self) -> Result<String, Error> {
        Ok(self.dom.title.clone())
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize, Error> {
        Ok(self.dom.count(predicate))
    }

    async fn release(&self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dom() -> MockDom {
        MockDom::with_title("Vivek's Portfolio")
            .element(MockElement::new("canvas"))
            .element(MockElement::new("a").with_text("Home"))
            .element(MockElement::new("button").with_text("Contact"))
            .element(MockElement::new("div").with_class("navbar"))
            .element(MockElement::new("h2").with_text("Projects"))
    }

    #[test]
    fn test_dom_counts() {
        let dom = sample_dom();

        assert_eq!(dom.count(&Predicate::Tag("canvas".to_string())), 1);
        assert_eq!(
            dom.count(&Predicate::NavigationLike {
                class_marker: "nav".to_string()
            }),
            3
        );
        assert_eq!(
            dom.count(&Predicate::TextContainsAny(vec!["Project".to_string()])),
            1
        );
        assert_eq!(
            dom.count(&Predicate::TextContainsAny(vec![
                "Tools".to_string(),
                "Skills".to_string()
            ])),
            0
        );
    }

    #[tokio::test]
    async fn test_provider_counts_lifecycle() {
        let provider = MockSessionProvider::new(sample_dom());

        let session = provider.acquire().await.unwrap();
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.released(), 0);

        session.release().await;
        assert_eq!(provider.released(), 1);
    }

    #[tokio::test]
    async fn test_provider_acquisition_failure() {
        let provider = MockSessionProvider::new(sample_dom());
        provider.fail_acquisitions();

        let err = provider.acquire().await.unwrap_err();
        assert!(matches!(err, Error::Setup(_)));
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn test_session_queries() {
        let provider = MockSessionProvider::new(sample_dom());
        let session = provider.acquire().await.unwrap();

        assert_eq!(session.title().await.unwrap(), "Vivek's Portfolio");
        assert_eq!(
            session
                .count(&Predicate::Tag("canvas".to_string()))
                .await
                .unwrap(),
            1
        );

        session.release().await;
    }
}
