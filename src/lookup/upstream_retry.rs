use backon::{ExponentialBuilder, Retryable};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use url::Url;

use crate::error::{IsRetryable, LookupError};
use crate::utils::logging::with_pretty_json_debug;

pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;

/// `max_times` counts retries; the first attempt is not included.
pub(crate) fn retry_policy(max_times: usize) -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(300))
        .with_max_times(max_times.max(1))
        .with_jitter()
}

/// Accepts every `404` body as a definitive miss.
pub(crate) fn any_not_found(_body: &[u8]) -> bool {
    true
}

/// GET a JSON document. A `404` whose body passes `is_miss` is a definitive miss
/// (`Ok(None)`); any other `404` is an upstream error. Throttling, server errors
/// and connection failures are retried.
pub(crate) async fn get_json_with_retry<T>(
    service: &'static str,
    client: &reqwest::Client,
    url: &Url,
    retry_policy: ExponentialBuilder,
    is_miss: fn(&[u8]) -> bool,
) -> Result<Option<T>, LookupError>
where
    T: DeserializeOwned + Serialize,
{
    (|| async {
        let resp = client.get(url.clone()).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status == StatusCode::NOT_FOUND && is_miss(&bytes) {
            tracing::debug!(service, url = %url, "upstream has no entry");
            return Ok(None);
        }

        if !status.is_success() {
            let raw_body = String::from_utf8_lossy(&bytes);
            tracing::debug!(
                service,
                %status,
                url = %url,
                body = %format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS),
                "upstream error status"
            );
            return Err(LookupError::UpstreamStatus { service, status });
        }

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|source| LookupError::Decode { service, source })?;
        with_pretty_json_debug(&value, |pretty| {
            tracing::debug!(service, url = %url, body = %pretty, "upstream payload");
        });
        Ok(Some(value))
    })
    .retry(retry_policy)
    .when(|err: &LookupError| err.is_retryable())
    .notify(|err: &LookupError, dur: Duration| {
        tracing::debug!(service, error = %err, retry_in = ?dur, "upstream call failed (will retry)");
    })
    .await
}
