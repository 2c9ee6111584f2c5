//! brlaw-browser: browser session capability for court research
//!
//! The court research strategies in `brlaw-courts` drive a real browser,
//! but never depend on a concrete automation driver. This crate defines the
//! capability they consume: the [`Page`] trait plus the small value types
//! that cross it.
//!
//! ## Capability surface
//!
//! - Navigation with a load-completion milestone
//! - Selector-based element location, text and value extraction with
//!   bounded waits
//! - Mouse clicks at page coordinates (for iframe widgets that cannot be
//!   reached by selector)
//! - Frame enumeration and bounding-box queries
//! - In-page script evaluation with a JSON result (used to issue fetches
//!   that carry the page's session cookies)
//!
//! A CDP or WebDriver binding implements [`Page`] on the host side; tests
//! in `brlaw-courts` implement it with a scripted fake.

pub mod error;
pub mod page;

pub use error::{BrowserError, Result};
pub use page::{BoundingBox, Frame, LoadState, Page};
