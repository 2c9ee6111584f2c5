//! brlaw-courts: legal precedent research across Brazilian courts
//!
//! Each supported court gets one strategy implementing [`CourtResearch`]:
//! the full protocol from navigation through result extraction, normalized
//! into [`LegalPrecedent`] records. The strategies drive a browser through
//! the [`brlaw_browser::Page`] capability and never touch a concrete
//! automation driver.
//!
//! ## Strategies
//!
//! - [`Stj`]: interactive search UI behind a Cloudflare interstitial;
//!   attempts run under the retry orchestrator in [`retry`].
//! - [`Tjes`]: JSON search API fetched from inside the page session; its
//!   failures degrade to an empty result list instead of retrying.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brlaw_courts::{Court, SearchRequest};
//!
//! let request = SearchRequest::new("\"dano moral\" AND \"indenização\"", 1);
//! let precedents = Court::Stj.research(&page, &request).await?;
//! ```
//!
//! Every research call owns its page for the duration of the call; run
//! concurrent calls on independent sessions.

pub mod cloudflare;
pub mod error;
pub mod models;
pub mod retry;
pub mod sanitize;
pub mod stj;
pub mod tjes;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use brlaw_browser::Page;

pub use error::{ResearchError, Result};
pub use models::{LegalPrecedent, SearchRequest};
pub use retry::RetryPolicy;
pub use sanitize::{SanitizedQuery, sanitize};
pub use stj::{Stj, StjConfig};
pub use tjes::{Tjes, TjesConfig};

/// One court's complete research protocol.
///
/// Implementations raise on conditions fatal to the call; a populated or
/// empty list is the only success shape, never partial results.
#[async_trait]
pub trait CourtResearch: Send + Sync {
    /// Short court name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Run one research call: navigate, search, paginate to the requested
    /// page and normalize the results.
    async fn research(
        &self,
        page: &dyn Page,
        request: &SearchRequest,
    ) -> Result<Vec<LegalPrecedent>>;
}

/// The closed set of supported courts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Court {
    /// Superior Tribunal de Justiça
    Stj,
    /// Tribunal de Justiça do Espírito Santo
    Tjes,
}

impl Court {
    /// Strategy for this court with default configuration.
    pub fn strategy(&self) -> Box<dyn CourtResearch> {
        match self {
            Court::Stj => Box::new(Stj::new()),
            Court::Tjes => Box::new(Tjes::new()),
        }
    }

    /// Research this court with the default strategy configuration.
    pub async fn research(
        &self,
        page: &dyn Page,
        request: &SearchRequest,
    ) -> Result<Vec<LegalPrecedent>> {
        self.strategy().research(page, request).await
    }
}
