use serde::{Deserialize, Serialize};
use url::Url;

/// Upstream drug lookup configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// PubChem PUG REST base URL (must end with `/`).
    /// TOML: `lookup.pubchem_url`. Default: `https://pubchem.ncbi.nlm.nih.gov/rest/pug/`.
    #[serde(default = "default_pubchem_url")]
    pub pubchem_url: Url,

    /// Wikipedia REST base URL (must end with `/`); the language edition is part of the host.
    /// TOML: `lookup.wikipedia_url`. Default: `https://it.wikipedia.org/api/rest_v1/`.
    #[serde(default = "default_wikipedia_url")]
    pub wikipedia_url: Url,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// TOML: `lookup.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Retries after the first failed upstream call, so a request is sent at most
    /// `retry_max_times + 1` times. Values below 1 are raised to 1.
    /// TOML: `lookup.retry_max_times`. Default: `3`.
    #[serde(default = "default_retry_max_times")]
    pub retry_max_times: usize,

    /// Per-request timeout in seconds.
    /// TOML: `lookup.timeout_secs`. Default: `10`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Lifetime of cached lookup answers.
    /// TOML: `lookup.cache_ttl_secs`. Default: `3600`.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached lookup answers.
    /// TOML: `lookup.cache_capacity`. Default: `1024`.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// User-Agent sent upstream; Wikimedia asks API clients to identify themselves.
    /// TOML: `lookup.user_agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            pubchem_url: default_pubchem_url(),
            wikipedia_url: default_wikipedia_url(),
            proxy: None,
            retry_max_times: default_retry_max_times(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_pubchem_url() -> Url {
    Url::parse("https://pubchem.ncbi.nlm.nih.gov/rest/pug/").expect("invalid fixed PubChem URL")
}

fn default_wikipedia_url() -> Url {
    Url::parse("https://it.wikipedia.org/api/rest_v1/").expect("invalid fixed Wikipedia URL")
}

fn default_retry_max_times() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_capacity() -> u64 {
    1024
}

fn default_user_agent() -> String {
    concat!("clinica/", env!("CARGO_PKG_VERSION")).to_string()
}
