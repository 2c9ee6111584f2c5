//! Data models for court research

use serde::{Deserialize, Serialize};

/// One legal precedent, normalized down to its summary text.
///
/// Immutable once constructed; ownership passes to the caller with the
/// research result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPrecedent {
    /// Summary text, non-empty after trimming
    pub summary: String,
}

impl LegalPrecedent {
    /// Build a precedent from a raw result fragment. Fragments that are
    /// empty after trimming are dropped here, before construction, so the
    /// non-empty invariant holds at the only construction site.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let summary = fragment.trim();
        if summary.is_empty() {
            return None;
        }
        Some(Self {
            summary: summary.to_string(),
        })
    }
}

/// One research request: free-text query plus the results page to land on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query, matched against precedent summaries
    pub query: String,
    /// Desired results page, 1-based
    pub page: u32,
}

impl SearchRequest {
    /// Create a request. Page numbers below 1 are clamped to 1.
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }

    /// Request for the first results page.
    pub fn first_page(query: impl Into<String>) -> Self {
        Self::new(query, 1)
    }
}
