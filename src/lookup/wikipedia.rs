use backon::ExponentialBuilder;
use clinica_schema::PageSummary;
use serde::Serialize;
use url::Url;

use super::pubchem::push_segments;
use super::upstream_retry::{any_not_found, get_json_with_retry};
use crate::error::LookupError;

/// Encyclopedia fallback shown when neither the catalog nor PubChem know a drug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncyclopediaSummary {
    pub title: String,
    pub description: Option<String>,
    pub extract: String,
    pub page_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    base: Url,
    retry_policy: ExponentialBuilder,
}

impl WikipediaClient {
    pub fn new(client: reqwest::Client, base: Url, retry_policy: ExponentialBuilder) -> Self {
        Self {
            client,
            base,
            retry_policy,
        }
    }

    /// Summary of the article titled `query`; disambiguation pages and empty extracts are misses.
    pub async fn summary(&self, query: &str) -> Result<Option<EncyclopediaSummary>, LookupError> {
        let title = article_title(query);
        let url = push_segments(&self.base, &["page", "summary", &title])?;
        let page: Option<PageSummary> =
            get_json_with_retry(
                "wikipedia",
                &self.client,
                &url,
                self.retry_policy,
                any_not_found,
            )
            .await?;

        Ok(page.and_then(|page| {
            let extract = page.usable_extract()?.to_string();
            Some(EncyclopediaSummary {
                description: page.description.clone(),
                page_url: page.page_url().map(str::to_string),
                thumbnail_url: page.thumbnail_url().map(str::to_string),
                title: page.title,
                extract,
            })
        }))
    }
}

/// Wikipedia titles use underscores and an upper-case first letter.
fn article_title(query: &str) -> String {
    let joined = query.split_whitespace().collect::<Vec<_>>().join("_");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}
