//! Browser page capability
//!
//! The research strategies never talk to a concrete automation driver.
//! They consume this trait, which a CDP or WebDriver binding implements
//! on the host side. Every bounded wait carries its own timeout; there is
//! no external cancellation signal threaded through the call chain.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Load milestone to wait for after a navigation or in-page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// DOM parsed, subresources may still be loading
    DomContentLoaded,
    /// Window load event fired
    Load,
    /// No network connections for a quiet period
    NetworkIdle,
}

/// An embedded frame, identified by its document URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// URL of the frame's document, empty if not yet committed
    pub url: String,
}

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One browser page owned by a single research call.
///
/// Implementations are expected to be used from one logical flow of
/// control at a time; nothing here is retried transparently.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to a URL and wait for the given load milestone.
    async fn goto(&self, url: &str, wait_until: LoadState) -> Result<()>;

    /// Current page title.
    async fn title(&self) -> Result<String>;

    /// Value of the first element matching the selector, with a bounded wait
    /// for the element to exist.
    async fn input_value(&self, selector: &str, timeout: Duration) -> Result<String>;

    /// All frames currently attached to the page, main frame included.
    async fn frames(&self) -> Result<Vec<Frame>>;

    /// Bounding box of the frame element whose document URL contains the
    /// given fragment. `None` when the frame exists but has no layout yet.
    async fn frame_bounding_box(&self, url_fragment: &str) -> Result<Option<BoundingBox>>;

    /// Dispatch a mouse click at page coordinates.
    async fn click_at(&self, x: f64, y: f64) -> Result<()>;

    /// Wait until an element matching the selector is visible.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Click the first element matching the selector.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Replace the value of the first element matching the selector.
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Send a key press to the first element matching the selector.
    async fn press(&self, selector: &str, key: &str) -> Result<()>;

    /// Text content of the first element matching the selector, with a
    /// bounded wait for the element to exist.
    async fn text_content(&self, selector: &str, timeout: Duration) -> Result<String>;

    /// Text content of every element matching the selector, in DOM order.
    /// Zero matches is not an error.
    async fn texts_of_all(&self, selector: &str) -> Result<Vec<String>>;

    /// Wait for the page to reach a load milestone.
    async fn wait_for_load(&self, state: LoadState, timeout: Duration) -> Result<()>;

    /// Wait until a script expression evaluates truthy in the page.
    async fn wait_for_function(&self, expression: &str, timeout: Duration) -> Result<()>;

    /// Run a script in the page context and return its JSON result. The
    /// argument is made available to the script; promises are awaited.
    async fn evaluate(&self, script: &str, arg: Value) -> Result<Value>;

    /// Tear the session down. Further calls fail with `SessionClosed`.
    async fn close(&self) -> Result<()>;
}
