use crate::auth::dummy_hash;
use crate::config::BasicConfig;
use crate::db::DbActorHandle;
use crate::lookup::DrugLookup;
use crate::render;
use crate::server::routes::{auth, drugs, pages, patients};

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::{Html, Response},
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use rand::RngCore;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
/// Forms are small; the roster import is the largest body we accept.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
pub const LOGIN_LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct ClinicaState {
    pub db: DbActorHandle,
    pub lookup: DrugLookup,
    pub cookie_key: Key,
    pub insecure_cookie: bool,
    /// Login attempts, keyed by lowercased username.
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
    /// Work factor for hashes created at registration.
    pub password_iterations: u32,
    /// Verified instead of a real hash when the username is unknown.
    pub dummy_password_hash: Arc<str>,
}

impl ClinicaState {
    pub fn new(db: DbActorHandle, lookup: DrugLookup, basic: &BasicConfig) -> Self {
        let per_minute =
            NonZeroU32::new(basic.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let password_iterations = basic.password_iterations.max(1);
        Self {
            db,
            lookup,
            cookie_key: basic.cookie_key(),
            insecure_cookie: basic.insecure_cookie,
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            password_iterations,
            dummy_password_hash: dummy_hash(password_iterations).into(),
        }
    }

    /// Drops limiter keys whose bucket has fully refilled and releases the memory.
    pub fn prune_login_limiter(&self) {
        let before = self.login_limiter.len();
        self.login_limiter.retain_recent();
        self.login_limiter.shrink_to_fit();
        let after = self.login_limiter.len();
        if before != after {
            debug!(before, after, "pruned login limiter");
        }
    }

    /// Prunes the login limiter every [`LOGIN_LIMITER_PRUNE_INTERVAL`] until the runtime stops.
    pub fn spawn_login_limiter_pruner(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(LOGIN_LIMITER_PRUNE_INTERVAL);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                state.prune_login_limiter();
            }
        })
    }
}

impl FromRef<ClinicaState> for Key {
    fn from_ref(state: &ClinicaState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, render::not_found_page())
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    macro_rules! log_line {
        ($level:ident) => {
            $level!(
                "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
                status.as_u16(),
                request_id,
                method.as_str(),
                protocol,
                path,
                latency_ms,
                user_agent
            )
        };
    }

    if status.is_server_error() {
        log_line!(error);
    } else if status.is_client_error() {
        log_line!(warn);
    } else {
        log_line!(info);
    }

    resp
}

pub fn clinica_router(state: ClinicaState) -> Router {
    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(patients::router())
        .merge(drugs::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(access_log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_url_safe() {
        let id = generate_request_id();
        assert_eq!(id.len(), 16);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn protocol_labels() {
        assert_eq!(format_http_version(Version::HTTP_11), "HTTP/1.1");
        assert_eq!(format_http_version(Version::HTTP_2), "HTTP/2");
    }
}
