use crate::auth::{clear_session, hash_password, start_session, verify_password_or_dummy};
use crate::db::DoctorCreate;
use crate::error::ClinicaError;
use crate::render::{self, RegisterValues};
use crate::server::router::ClinicaState;
use crate::server::routes::non_blank;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

/// Longest username prefix used as a rate-limit key.
pub const MAX_LIMITER_KEY_CHARS: usize = 64;

/// Case-insensitive, length-capped limiter key for a login username.
pub fn login_limiter_key(username: &str) -> String {
    username
        .chars()
        .take(MAX_LIMITER_KEY_CHARS)
        .collect::<String>()
        .to_lowercase()
}

pub fn router() -> Router<ClinicaState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub specialty: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

async fn register_form() -> impl IntoResponse {
    render::register_page(None, &RegisterValues::default())
}

async fn register(
    State(state): State<ClinicaState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ClinicaError> {
    let username = form.username.trim();
    let values = RegisterValues {
        username,
        full_name: form.full_name.trim(),
        specialty: form.specialty.trim(),
    };

    if username.is_empty() || form.password.is_empty() {
        let page = render::register_page(Some("Nome utente e password sono obbligatori."), &values);
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let password = form.password.clone();
    let iterations = state.password_iterations;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| ClinicaError::UnexpectedError(format!("password hashing task: {e}")))?;

    let create = DoctorCreate {
        username: username.to_string(),
        password_hash,
        full_name: values.full_name.to_string(),
        specialty: non_blank(&form.specialty),
    };
    let doctor_id = match state.db.create_doctor(create).await {
        Ok(id) => id,
        Err(ClinicaError::UsernameTaken) => {
            let page = render::register_page(
                Some(&ClinicaError::UsernameTaken.public_message()),
                &values,
            );
            return Ok((StatusCode::CONFLICT, page).into_response());
        }
        Err(e) => return Err(e),
    };

    info!(doctor_id, username, "doctor registered");
    let jar = start_session(jar, doctor_id, state.insecure_cookie);
    Ok((jar, Redirect::to("/patients")).into_response())
}

async fn login_form() -> impl IntoResponse {
    render::login_page(None, "")
}

async fn login(
    State(state): State<ClinicaState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ClinicaError> {
    let username = form.username.trim();
    let limiter_key = login_limiter_key(username);

    if state.login_limiter.check_key(&limiter_key).is_err() {
        warn!(username = %limiter_key, "login rate limit exceeded");
        let page = render::login_page(Some("Troppi tentativi. Riprova tra un minuto."), username);
        return Ok((StatusCode::TOO_MANY_REQUESTS, page).into_response());
    }

    let doctor = state.db.get_doctor_by_username(username).await?;
    let password = form.password;
    let stored = doctor.as_ref().map(|d| d.password_hash.clone());
    let dummy = state.dummy_password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || {
        verify_password_or_dummy(&password, stored.as_deref(), &dummy)
    })
    .await
    .map_err(|e| ClinicaError::UnexpectedError(format!("password check task: {e}")))?;

    let Some(doctor) = doctor.filter(|_| verified) else {
        warn!(username = %limiter_key, "login failed");
        let page = render::login_page(Some("Credenziali non valide."), username);
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    };

    info!(doctor_id = doctor.id, "doctor logged in");
    let jar = start_session(jar, doctor.id, state.insecure_cookie);
    Ok((jar, Redirect::to("/patients")).into_response())
}

async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (clear_session(jar), Redirect::to("/login"))
}
