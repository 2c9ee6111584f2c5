//! STJ research strategy
//!
//! The Superior Tribunal de Justiça publishes jurisprudence through an
//! interactive search UI (SCON) behind a Cloudflare interstitial. One
//! attempt navigates, solves an eventual challenge, submits the summary
//! query through the advanced-search panel, paginates to the desired page
//! and extracts the raw summary textareas. Attempts run under the retry
//! orchestrator because the site regularly stalls mid-navigation.

use std::time::Duration;

use async_trait::async_trait;
use brlaw_browser::{LoadState, Page};
use tracing::{debug, info};

use crate::cloudflare::{self, SolverConfig};
use crate::error::{ResearchError, Result};
use crate::models::{LegalPrecedent, SearchRequest};
use crate::retry::{self, RetryPolicy};
use crate::CourtResearch;

const SEARCH_URL: &str = "https://scon.stj.jus.br/SCON/";
const ADVANCED_SEARCH_BUTTON: &str = "#idMostrarPesquisaAvancada";
const SUMMARY_INPUT: &str = "#ementa";
const RESULTS_CONTAINER: &str = "#corpopaginajurisprudencia";
const RAW_SUMMARY: &str = "textarea[id^=textSemformatacao]";
const ERROR_MESSAGE: &str = "div.erroMensagem";
const NEXT_PAGE_ANCHOR: &str = "a.iconeProximaPagina";
const NOT_FOUND_MARKER: &str = "Nenhum documento encontrado!";
const PAGE_READY_EXPRESSION: &str = "document.readyState === 'complete'";

/// Tunables for the STJ strategy, defaults matching the live site.
#[derive(Debug, Clone)]
pub struct StjConfig {
    pub search_url: String,
    /// Budget for navigations and load-state waits
    pub navigation_timeout: Duration,
    /// Budget for individual element waits
    pub locator_timeout: Duration,
    pub solver: SolverConfig,
    pub retry: RetryPolicy,
}

impl Default for StjConfig {
    fn default() -> Self {
        Self {
            search_url: SEARCH_URL.to_string(),
            navigation_timeout: Duration::from_secs(30),
            locator_timeout: Duration::from_secs(30),
            solver: SolverConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Research strategy for the Superior Tribunal de Justiça.
#[derive(Default)]
pub struct Stj {
    config: StjConfig,
}

impl Stj {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StjConfig) -> Self {
        Self { config }
    }

    /// Single research attempt, from navigation through extraction.
    async fn attempt_research(
        &self,
        page: &dyn Page,
        request: &SearchRequest,
    ) -> Result<Vec<LegalPrecedent>> {
        page.goto(&self.config.search_url, LoadState::DomContentLoaded)
            .await?;

        if cloudflare::is_challenge(page).await {
            info!("Challenge detected on STJ, attempting to solve");
            if !cloudflare::solve_challenge(page, &self.config.solver).await {
                return Err(ResearchError::ChallengeUnresolved);
            }
            info!("Challenge solved successfully");
        }

        // The search form is scripted; wait until the document settles
        page.wait_for_load(LoadState::NetworkIdle, self.config.navigation_timeout)
            .await?;
        page.wait_for_function(PAGE_READY_EXPRESSION, self.config.navigation_timeout)
            .await?;
        debug!("STJ page fully loaded");

        page.wait_for_selector(ADVANCED_SEARCH_BUTTON, self.config.locator_timeout)
            .await?;
        page.click(ADVANCED_SEARCH_BUTTON).await?;

        page.wait_for_selector(SUMMARY_INPUT, self.config.locator_timeout)
            .await?;
        page.fill(SUMMARY_INPUT, &request.query).await?;
        page.press(SUMMARY_INPUT, "Enter").await?;

        page.wait_for_selector(RESULTS_CONTAINER, self.config.navigation_timeout)
            .await?;

        let mut fragments = self.extract_fragments(page).await?;

        let mut current_page = 1;
        while current_page != request.page {
            page.click(NEXT_PAGE_ANCHOR).await?;
            page.wait_for_load(LoadState::Load, self.config.navigation_timeout)
                .await?;
            fragments = self.extract_fragments(page).await?;
            current_page += 1;
        }

        Ok(fragments
            .iter()
            .filter_map(|fragment| LegalPrecedent::from_fragment(fragment))
            .collect())
    }

    /// Raw summary texts on the current results page.
    ///
    /// Zero fragments is only a true empty result set when the site shows
    /// its explicit not-found message; anything else means the layout or
    /// navigation broke and the attempt should be retried.
    async fn extract_fragments(&self, page: &dyn Page) -> Result<Vec<String>> {
        let fragments = page.texts_of_all(RAW_SUMMARY).await?;
        debug!("Found {} raw summaries on the current page", fragments.len());

        if fragments.is_empty() {
            let message = page
                .text_content(ERROR_MESSAGE, self.config.locator_timeout)
                .await
                .map_err(|error| {
                    debug!("No results and no error message: {}", error);
                    ResearchError::UnexpectedEmptyState
                })?;

            if message.contains(NOT_FOUND_MARKER) {
                info!("No legal precedents found");
                return Ok(Vec::new());
            }
            return Err(ResearchError::UnexpectedEmptyState);
        }

        Ok(fragments)
    }
}

#[async_trait]
impl CourtResearch for Stj {
    fn name(&self) -> &'static str {
        "STJ"
    }

    async fn research(
        &self,
        page: &dyn Page,
        request: &SearchRequest,
    ) -> Result<Vec<LegalPrecedent>> {
        info!(
            "Starting research for STJ legal precedents with query {:?}",
            request.query
        );
        retry::research_with_retry(self.name(), &self.config.retry, page, |attempt_page| {
            Box::pin(self.attempt_research(attempt_page, request))
        })
        .await
    }
}
