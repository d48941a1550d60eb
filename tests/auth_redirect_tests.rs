mod common;

use axum::http::StatusCode;
use clinica::server::clinica_router;
use common::*;
use std::fs;
use std::time::Duration;

#[tokio::test]
async fn protected_routes_redirect_to_login_without_a_session() {
    let (db, path) = spawn_db("auth-redirect").await;
    let app = build_app(&db, &unreachable_upstream());

    for uri in ["/patients", "/patients/new", "/patients/1", "/drugs", "/aggiungi_farmaco"] {
        let resp = send(&app, get(uri, None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&resp), "/login", "GET {uri}");
    }

    let resp = send(&app, post_form("/search", None, &[("query", "aspirina")])).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    // A cookie that does not decrypt with the server key counts as no session.
    let resp = send(&app, get("/patients", Some("clinica_session=forged"))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn public_pages_and_fallback() {
    let (db, path) = spawn_db("auth-public").await;
    let app = build_app(&db, &unreachable_upstream());

    for uri in ["/", "/processo", "/contatti", "/calcoli", "/login", "/register"] {
        let resp = send(&app, get(uri, None)).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }

    let resp = send(&app, get("/healthz", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");

    let resp = send(&app, get("/does-not-exist", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_string(resp).await.contains("Pagina non trovata."));

    let resp = send(&app, get("/healthz", None)).await;
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = send(
        &app,
        post_form("/calcoli", None, &[("weight_kg", "70"), ("height_cm", "175")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("22.9"), "{body}");
    assert!(body.contains("Normopeso"));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn login_logout_and_bad_credentials() {
    let (db, path) = spawn_db("auth-login").await;
    let app = build_app(&db, &unreachable_upstream());
    create_doctor(&db, "bianchi").await;

    let resp = send(
        &app,
        post_form("/login", None, &[("username", "bianchi"), ("password", "wrong")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(resp).await.contains("Credenziali non valide."));

    let resp = send(
        &app,
        post_form("/login", None, &[("username", "nessuno"), ("password", "x")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "bianchi").await;
    let resp = send(&app, get("/patients", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Dr bianchi"));

    let resp = send(&app, post_form("/logout", Some(&cookie), &[])).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    let cleared = cookie_header_from_set_cookie_headers(resp.headers());
    assert_eq!(cleared, "clinica_session=");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn registration_validates_and_logs_in() {
    let (db, path) = spawn_db("auth-register").await;
    let app = build_app(&db, &unreachable_upstream());

    let resp = send(
        &app,
        post_form("/register", None, &[("username", "  "), ("password", "x")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(resp).await.contains("obbligatori"));

    create_doctor(&db, "verdi").await;
    let resp = send(
        &app,
        post_form(
            "/register",
            None,
            &[("username", "verdi"), ("password", "altra"), ("full_name", "Anna Verdi")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_string(resp).await;
    assert!(body.contains("Nome utente già registrato."));
    assert!(body.contains("Anna Verdi"), "form values are kept");

    let resp = send(
        &app,
        post_form(
            "/register",
            None,
            &[
                ("username", "neri"),
                ("password", "s3greto"),
                ("full_name", "Luca Neri"),
                ("specialty", "Cardiologia"),
            ],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/patients");
    let cookie = cookie_header_from_set_cookie_headers(resp.headers());

    let doctor = db
        .get_doctor_by_username("neri")
        .await
        .unwrap()
        .expect("doctor stored");
    assert_eq!(doctor.full_name, "Luca Neri");
    assert_eq!(doctor.specialty.as_deref(), Some("Cardiologia"));
    assert!(
        doctor.password_hash.starts_with("pbkdf2-sha256$1000$"),
        "registration hashes with the configured work factor"
    );

    let resp = send(&app, get("/patients", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn login_attempts_are_limited_per_username() {
    let (db, path) = spawn_db("auth-rate-limit").await;
    let state = build_state(&db, &unreachable_upstream(), |cfg| {
        cfg.basic.login_attempts_per_minute = 2;
    });
    let app = clinica_router(state);
    create_doctor(&db, "rossi").await;
    create_doctor(&db, "bianchi").await;

    for _ in 0..2 {
        let resp = send(
            &app,
            post_form("/login", None, &[("username", "rossi"), ("password", "wrong")]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // Same bucket whatever the case, and even with the right password.
    let resp = send(
        &app,
        post_form(
            "/login",
            None,
            &[("username", " Rossi "), ("password", TEST_PASSWORD)],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().get("set-cookie").is_none());
    let body = body_string(resp).await;
    assert!(body.contains("Troppi tentativi"), "{body}");
    assert!(body.contains("Rossi"), "username is kept in the form");

    // Other usernames have their own budget.
    login(&app, "bianchi").await;

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn idle_login_limiter_keys_are_pruned() {
    let (db, path) = spawn_db("auth-limiter-prune").await;
    // One minute split into 60M cells: a key refills after about a microsecond.
    let state = build_state(&db, &unreachable_upstream(), |cfg| {
        cfg.basic.login_attempts_per_minute = 60_000_000;
    });
    let app = clinica_router(state.clone());

    for i in 0..200 {
        let username = format!("{i:03}-{}", "x".repeat(1_000));
        let resp = send(
            &app,
            post_form("/login", None, &[("username", &username), ("password", "x")]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(state.login_limiter.len(), 200);

    tokio::time::sleep(Duration::from_millis(50)).await;
    state.prune_login_limiter();
    assert_eq!(state.login_limiter.len(), 0);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn unknown_usernames_are_checked_against_a_dummy_hash() {
    let (db, path) = spawn_db("auth-dummy-hash").await;
    let state = build_state(&db, &unreachable_upstream(), |_| {});
    assert!(
        state
            .dummy_password_hash
            .starts_with(&format!("pbkdf2-sha256${TEST_PASSWORD_ITERATIONS}$")),
        "dummy hash costs the same as a real one"
    );
    let app = clinica_router(state);
    create_doctor(&db, "rossi").await;

    for (username, password) in [("nessuno", TEST_PASSWORD), ("rossi", "wrong")] {
        let resp = send(
            &app,
            post_form("/login", None, &[("username", username), ("password", password)]),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{username}");
        assert!(body_string(resp).await.contains("Credenziali non valide."));
    }

    let _ = fs::remove_file(&path);
}
