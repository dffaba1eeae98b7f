//! Common test utilities
//!
//! Canned page models shared by the integration tests.

use portfolio_smoke::session::{MockDom, MockElement};

/// A page model resembling the deployed portfolio: title, canvas, navigation,
/// project and skills sections all present.
pub fn full_portfolio() -> MockDom {
    MockDom::with_title("Vivek's Portfolio")
        .element(MockElement::new("canvas"))
        .element(MockElement::new("a").with_text("Home"))
        .element(MockElement::new("a").with_text("About"))
        .element(MockElement::new("button").with_text("Contact"))
        .element(MockElement::new("div").with_class("nav-links"))
        .element(MockElement::new("h2").with_text("Projects"))
        .element(MockElement::new("div").with_text("Project: SoMo"))
        .element(MockElement::new("h2").with_text("Skills & Tools"))
}

/// A page model with nothing the probes look for.
pub fn blank_page() -> MockDom {
    MockDom::with_title("Untitled")
}

/// The full portfolio with every element matching one predicate removed.
pub fn without_tag(mut dom: MockDom, tag: &str) -> MockDom {
    dom.elements.retain(|el| el.tag != tag);
    dom
}

/// The full portfolio with every element whose text contains `needle`
/// removed.
pub fn without_text(mut dom: MockDom, needle: &str) -> MockDom {
    dom.elements.retain(|el| !el.text.contains(needle));
    dom
}
