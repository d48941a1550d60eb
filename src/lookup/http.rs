use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

use crate::config::LookupConfig;
use crate::error::LookupError;

/// Shared client for the outbound lookups.
pub fn build_client(cfg: &LookupConfig) -> Result<reqwest::Client, LookupError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = reqwest::Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(cfg.timeout_secs.max(1)));

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    Ok(builder.default_headers(headers).build()?)
}
