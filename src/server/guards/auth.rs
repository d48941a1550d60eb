use crate::auth::doctor_id_from_jar;
use crate::db::DbDoctor;
use crate::error::ClinicaError;
use crate::server::router::ClinicaState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use tracing::debug;

async fn session_doctor(
    parts: &mut Parts,
    state: &ClinicaState,
) -> Result<Option<DbDoctor>, ClinicaError> {
    let jar =
        match <PrivateCookieJar as FromRequestParts<ClinicaState>>::from_request_parts(parts, state)
            .await
        {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
    let Some(doctor_id) = doctor_id_from_jar(&jar) else {
        return Ok(None);
    };
    let doctor = state.db.get_doctor(doctor_id).await?;
    if doctor.is_none() {
        debug!(doctor_id, "session refers to a missing doctor");
    }
    Ok(doctor)
}

/// Extractor for routes that need a logged-in doctor.
#[derive(Debug, Clone)]
pub struct RequireDoctor(pub DbDoctor);

impl FromRequestParts<ClinicaState> for RequireDoctor {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClinicaState,
    ) -> Result<Self, Self::Rejection> {
        match session_doctor(parts, state).await {
            Ok(Some(doctor)) => Ok(RequireDoctor(doctor)),
            Ok(None) => Err(AuthRejection::LoginRequired),
            Err(e) => Err(AuthRejection::Failed(e)),
        }
    }
}

/// The logged-in doctor, if any. Public pages use it to adapt the navigation.
#[derive(Debug, Clone)]
pub struct MaybeDoctor(pub Option<DbDoctor>);

impl FromRequestParts<ClinicaState> for MaybeDoctor {
    type Rejection = ClinicaError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClinicaState,
    ) -> Result<Self, Self::Rejection> {
        session_doctor(parts, state).await.map(MaybeDoctor)
    }
}

pub enum AuthRejection {
    LoginRequired,
    Failed(ClinicaError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired => Redirect::to("/login").into_response(),
            AuthRejection::Failed(e) => e.into_response(),
        }
    }
}
