//! Browser session lifecycle
//!
//! A session is an opaque handle to a running browser page, exclusively owned
//! by the single test case that created it: acquired (navigation included) at
//! case start, queried during the case, and released unconditionally at case
//! end. Nothing outlives a case; nothing is shared across cases.

pub mod live;
pub mod mock;
pub mod traits;

pub use live::CdpSessionProvider;
pub use mock::{MockDom, MockElement, MockSessionProvider};
pub use traits::{PageSession, SessionProvider};
