//! Drug information lookup.
//!
//! The chain is: local catalog, then PubChem, then the Wikipedia summary.
//! Failures of the external services are logged and treated as misses, so a
//! search never fails because an upstream is down; only database errors
//! propagate.

mod cache;
mod http;
mod pubchem;
mod upstream_retry;
mod wikipedia;

pub use cache::LookupCache;
pub use http::build_client;
pub use pubchem::{CompoundInfo, PubChemClient};
pub use upstream_retry::UPSTREAM_BODY_PREVIEW_CHARS;
pub use wikipedia::{EncyclopediaSummary, WikipediaClient};

use crate::config::LookupConfig;
use crate::db::{DbActorHandle, DbDrug};
use crate::error::ClinicaError;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    EmptyQuery,
    Local(Vec<DbDrug>),
    PubChem(CompoundInfo),
    Encyclopedia(EncyclopediaSummary),
    NotFound,
}

/// Result of the external part of the chain; only definitive answers are cached.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalAnswer {
    PubChem(CompoundInfo),
    Encyclopedia(EncyclopediaSummary),
    NotFound,
}

impl From<ExternalAnswer> for SearchOutcome {
    fn from(answer: ExternalAnswer) -> Self {
        match answer {
            ExternalAnswer::PubChem(c) => SearchOutcome::PubChem(c),
            ExternalAnswer::Encyclopedia(s) => SearchOutcome::Encyclopedia(s),
            ExternalAnswer::NotFound => SearchOutcome::NotFound,
        }
    }
}

#[derive(Clone)]
pub struct DrugLookup {
    db: DbActorHandle,
    pubchem: PubChemClient,
    wikipedia: WikipediaClient,
    cache: LookupCache,
}

impl DrugLookup {
    pub fn new(db: DbActorHandle, cfg: &LookupConfig, client: reqwest::Client) -> Self {
        let retry_policy = upstream_retry::retry_policy(cfg.retry_max_times);
        Self {
            db,
            pubchem: PubChemClient::new(client.clone(), cfg.pubchem_url.clone(), retry_policy),
            wikipedia: WikipediaClient::new(client, cfg.wikipedia_url.clone(), retry_policy),
            cache: LookupCache::new(cfg.cache_ttl_secs, cfg.cache_capacity),
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, ClinicaError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }

        let local = self.db.search_drugs(query).await?;
        if !local.is_empty() {
            info!(query, hits = local.len(), source = "local", "drug search");
            return Ok(SearchOutcome::Local(local));
        }

        if let Some(answer) = self.cache.get(query) {
            info!(query, source = "cache", "drug search");
            return Ok(answer.into());
        }

        let (answer, definitive) = self.search_external(query).await;
        if definitive {
            self.cache.put(query, answer.clone());
        }
        Ok(answer.into())
    }

    /// Returns the answer and whether every consulted service gave a real answer.
    async fn search_external(&self, query: &str) -> (ExternalAnswer, bool) {
        let mut definitive = true;

        match self.pubchem.compound_by_name(query).await {
            Ok(Some(compound)) => {
                info!(query, cid = compound.cid, source = "pubchem", "drug search");
                return (ExternalAnswer::PubChem(compound), true);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(query, error = %e, "PubChem lookup failed; falling back to Wikipedia");
                definitive = false;
            }
        }

        match self.wikipedia.summary(query).await {
            Ok(Some(summary)) => {
                info!(query, title = %summary.title, source = "wikipedia", "drug search");
                (ExternalAnswer::Encyclopedia(summary), definitive)
            }
            Ok(None) => {
                info!(query, "drug not found");
                (ExternalAnswer::NotFound, definitive)
            }
            Err(e) => {
                warn!(query, error = %e, "Wikipedia lookup failed");
                (ExternalAnswer::NotFound, false)
            }
        }
    }
}
