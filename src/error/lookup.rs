use super::IsRetryable;
use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Failure talking to an external drug information service.
#[derive(Debug, ThisError)]
pub enum LookupError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} answered with status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{service} payload could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl IsRetryable for LookupError {
    fn is_retryable(&self) -> bool {
        match self {
            LookupError::Request(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            LookupError::UpstreamStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            LookupError::Decode { .. } | LookupError::Url(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_throttling_and_server_errors_are_retryable() {
        let server = LookupError::UpstreamStatus {
            service: "pubchem",
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        let throttled = LookupError::UpstreamStatus {
            service: "wikipedia",
            status: StatusCode::TOO_MANY_REQUESTS,
        };
        let bad_request = LookupError::UpstreamStatus {
            service: "pubchem",
            status: StatusCode::BAD_REQUEST,
        };
        let decode = LookupError::Decode {
            service: "pubchem",
            source: serde_json::from_str::<u8>("x").unwrap_err(),
        };

        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!decode.is_retryable());
    }
}
