#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use clinica::auth::hash_password;
use clinica::config::Config;
use clinica::db::{DbActorHandle, DoctorCreate};
use clinica::lookup::{DrugLookup, build_client};
use clinica::server::{ClinicaState, clinica_router};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub const TEST_PASSWORD: &str = "passw0rd";
/// Cheap work factor so hashing and the unknown-user check stay fast.
pub const TEST_PASSWORD_ITERATIONS: u32 = 1_000;

pub fn unique_sqlite_path(prefix: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "clinica-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

pub async fn spawn_db(prefix: &str) -> (DbActorHandle, std::path::PathBuf) {
    let path = unique_sqlite_path(prefix);
    let database_url = format!("sqlite:{}", path.display());
    let db = clinica::db::spawn(&database_url)
        .await
        .expect("failed to spawn DbActor");
    (db, path)
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{addr}/")).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// State wired to `db`, with both lookup upstreams pointed at `upstream`.
/// `configure` runs last, so tests can override any default set here.
pub fn build_state(
    db: &DbActorHandle,
    upstream: &Url,
    configure: impl FnOnce(&mut Config),
) -> ClinicaState {
    let mut cfg = Config::default();
    cfg.basic.insecure_cookie = true;
    cfg.basic.password_iterations = TEST_PASSWORD_ITERATIONS;
    cfg.lookup.pubchem_url = upstream.join("pug/").expect("pubchem base");
    cfg.lookup.wikipedia_url = upstream.join("wiki/").expect("wikipedia base");
    cfg.lookup.retry_max_times = 1;
    cfg.lookup.timeout_secs = 5;
    configure(&mut cfg);

    let client = build_client(&cfg.lookup).expect("reqwest client");
    let lookup = DrugLookup::new(db.clone(), &cfg.lookup, client);
    ClinicaState::new(db.clone(), lookup, &cfg.basic)
}

/// Router over [`build_state`] with the test defaults.
pub fn build_app(db: &DbActorHandle, upstream: &Url) -> Router {
    clinica_router(build_state(db, upstream, |_| {}))
}

/// Inserts a doctor with a cheap password hash so login stays fast in tests.
pub async fn create_doctor(db: &DbActorHandle, username: &str) -> i64 {
    db.create_doctor(DoctorCreate {
        username: username.to_string(),
        password_hash: hash_password(TEST_PASSWORD, TEST_PASSWORD_ITERATIONS),
        full_name: format!("Dr {username}"),
        specialty: None,
    })
    .await
    .expect("create doctor")
}

pub fn cookie_header_from_set_cookie_headers(headers: &axum::http::HeaderMap) -> String {
    let mut pairs: Vec<String> = Vec::new();
    for v in headers.get_all(header::SET_COOKIE).iter() {
        let s = v.to_str().expect("set-cookie header was not valid utf-8");
        let first = s.split(';').next().unwrap_or("");
        let mut parts = first.splitn(2, '=');
        let name = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        if !name.trim().is_empty() {
            pairs.push(format!("{}={}", name.trim(), value));
        }
    }
    pairs.join("; ")
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn post_form(uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(form_body(fields)))
        .expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Logs `username` in through `/login` and returns the `Cookie` header to reuse.
pub async fn login(app: &Router, username: &str) -> String {
    let resp = send(
        app,
        post_form(
            "/login",
            None,
            &[("username", username), ("password", TEST_PASSWORD)],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login should redirect");
    assert_eq!(location(&resp), "/patients");
    let cookie = cookie_header_from_set_cookie_headers(resp.headers());
    assert!(cookie.contains("clinica_session="), "missing session cookie");
    cookie
}

/// Base URL for tests that must never reach an upstream.
pub fn unreachable_upstream() -> Url {
    Url::parse("http://127.0.0.1:9/").expect("valid url")
}
