//! TJES research strategy
//!
//! The Tribunal de Justiça do Espírito Santo exposes a JSON search API, but
//! it only answers requests carrying the session cookies issued on the
//! landing page. The strategy therefore navigates once to establish the
//! session and then issues the fetch from inside the page. The API's WAF
//! blocks heavily-quoted boolean queries, so a blocked primary request is
//! retried once with the sanitizer's unquoted fallback. Failures on this
//! path are overwhelmingly non-transient, so they degrade to an empty
//! result list instead of an error.

use async_trait::async_trait;
use brlaw_browser::{LoadState, Page};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::models::{LegalPrecedent, SearchRequest};
use crate::sanitize::sanitize;
use crate::CourtResearch;

const BASE_URL: &str = "https://sistemas.tjes.jus.br/consulta-jurisprudencia";
const SEARCH_CORE: &str = "pje2g";
const PER_PAGE: u32 = 20;
const MIN_ABSTRACT_LENGTH: usize = 30;
const BLOCKED_STATUS: u64 = 403;

// Runs inside the page so the request carries the session cookies
const FETCH_SCRIPT: &str = r#"async (url) => {
    const resp = await fetch(url);
    let body = null;
    if (resp.ok) {
        body = await resp.json();
    }
    return { status: resp.status, body };
}"#;

/// Tunables for the TJES strategy, defaults matching the live site.
#[derive(Debug, Clone)]
pub struct TjesConfig {
    pub base_url: String,
    /// API page size
    pub per_page: u32,
    /// Below this trimmed length the case abstract is considered unusable
    /// and the full-decision text is used instead
    pub min_abstract_length: usize,
}

impl Default for TjesConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            per_page: PER_PAGE,
            min_abstract_length: MIN_ABSTRACT_LENGTH,
        }
    }
}

/// One document returned by the TJES search API.
#[derive(Debug, Clone, Default, Deserialize)]
struct TjesDocument {
    #[serde(default)]
    nr_processo: String,
    #[serde(default)]
    classe_judicial: String,
    #[serde(default)]
    magistrado: String,
    #[serde(default)]
    orgao_julgador: String,
    #[serde(default)]
    dt_juntada: String,
    #[serde(default)]
    assunto_principal: String,
    #[serde(default)]
    ementa: String,
    #[serde(default)]
    acordao: Option<String>,
    #[serde(default)]
    inteiro_teor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<TjesDocument>,
    #[serde(default)]
    total: u64,
}

enum FetchOutcome {
    Success(SearchResponse),
    Blocked,
    Failed,
}

/// Research strategy for the Tribunal de Justiça do Espírito Santo.
#[derive(Default)]
pub struct Tjes {
    config: TjesConfig,
}

impl Tjes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TjesConfig) -> Self {
        Self { config }
    }

    /// Build the API request URL for one query and page.
    fn search_url(&self, query: &str, page: u32) -> Option<String> {
        let mut url = match Url::parse(&format!("{}/api/search", self.config.base_url)) {
            Ok(url) => url,
            Err(error) => {
                warn!(
                    "Invalid TJES base URL {:?}: {}",
                    self.config.base_url, error
                );
                return None;
            }
        };
        url.query_pairs_mut()
            .append_pair("core", SEARCH_CORE)
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.config.per_page.to_string());
        Some(url.into())
    }

    /// Issue one in-page fetch and classify the outcome.
    async fn fetch_once(&self, page: &dyn Page, url: &str) -> FetchOutcome {
        debug!("Fetching TJES API: {}", url);

        let result = match page.evaluate(FETCH_SCRIPT, Value::String(url.to_string())).await {
            Ok(result) => result,
            Err(error) => {
                warn!("TJES fetch script failed: {}", error);
                return FetchOutcome::Failed;
            }
        };

        let status = result.get("status").and_then(Value::as_u64).unwrap_or(0);
        if status == BLOCKED_STATUS {
            warn!("TJES API blocked the query (HTTP {})", status);
            return FetchOutcome::Blocked;
        }
        if !(200..300).contains(&status) {
            warn!("TJES API returned HTTP {}", status);
            return FetchOutcome::Failed;
        }

        let Some(body) = result.get("body") else {
            warn!("TJES API response carried no body");
            return FetchOutcome::Failed;
        };
        match serde_json::from_value::<SearchResponse>(body.clone()) {
            Ok(response) => FetchOutcome::Success(response),
            Err(error) => {
                warn!("Could not parse TJES API response: {}", error);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch the primary URL, falling back to the unquoted rewrite when the
    /// WAF blocks it. `None` means this call found nothing usable.
    async fn fetch_results(
        &self,
        page: &dyn Page,
        primary: &str,
        fallback: Option<&str>,
    ) -> Option<SearchResponse> {
        match self.fetch_once(page, primary).await {
            FetchOutcome::Success(response) => Some(response),
            FetchOutcome::Blocked => {
                let fallback = fallback?;
                info!("Retrying TJES query without quote delimiters");
                match self.fetch_once(page, fallback).await {
                    FetchOutcome::Success(response) => Some(response),
                    _ => None,
                }
            }
            FetchOutcome::Failed => None,
        }
    }

    /// Synthesize the multi-line summary for one API document.
    fn build_summary(&self, doc: &TjesDocument) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !doc.nr_processo.is_empty() {
            let mut header = format!("PROCESSO: {}", doc.nr_processo);
            if !doc.classe_judicial.is_empty() {
                header.push_str(" — ");
                header.push_str(&doc.classe_judicial);
            }
            parts.push(header);
        }
        if !doc.magistrado.is_empty() {
            parts.push(format!("RELATOR(A): {}", doc.magistrado));
        }
        if !doc.orgao_julgador.is_empty() {
            parts.push(format!("ÓRGÃO JULGADOR: {}", doc.orgao_julgador));
        }
        if !doc.dt_juntada.is_empty() {
            let date: String = doc.dt_juntada.chars().take(10).collect();
            parts.push(format!("DATA: {}", date));
        }
        if !doc.assunto_principal.is_empty() {
            parts.push(format!("ASSUNTO: {}", doc.assunto_principal));
        }

        let abstract_text = doc.ementa.trim();
        if abstract_text.chars().count() > self.config.min_abstract_length {
            parts.push(format!("\nEMENTA:\n{}", abstract_text));
        } else {
            let full_text = doc
                .acordao
                .as_deref()
                .or(doc.inteiro_teor.as_deref())
                .unwrap_or("")
                .trim();
            if !full_text.is_empty() {
                parts.push(format!("\nINTEIRO TEOR:\n{}", full_text));
            }
        }

        parts.join("\n")
    }
}

#[async_trait]
impl CourtResearch for Tjes {
    fn name(&self) -> &'static str {
        "TJES"
    }

    async fn research(
        &self,
        page: &dyn Page,
        request: &SearchRequest,
    ) -> Result<Vec<LegalPrecedent>> {
        info!(
            "Starting research for TJES legal precedents with query {:?}",
            request.query
        );

        // Establish the session cookies the API requires
        page.goto(
            &format!("{}/", self.config.base_url),
            LoadState::NetworkIdle,
        )
        .await?;

        let sanitized = sanitize(&request.query);
        let Some(primary) = self.search_url(&sanitized.primary, request.page) else {
            return Ok(Vec::new());
        };
        let fallback = sanitized
            .fallback
            .as_deref()
            .and_then(|query| self.search_url(query, request.page));

        let Some(response) = self
            .fetch_results(page, &primary, fallback.as_deref())
            .await
        else {
            return Ok(Vec::new());
        };

        info!(
            "TJES API returned {} documents (total: {}) for page {}",
            response.docs.len(),
            response.total,
            request.page
        );

        let precedents: Vec<LegalPrecedent> = response
            .docs
            .iter()
            .filter_map(|doc| LegalPrecedent::from_fragment(&self.build_summary(doc)))
            .collect();

        info!("Built {} legal precedents from TJES results", precedents.len());
        Ok(precedents)
    }
}
