use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinica_import::RosterError;
use thiserror::Error as ThisError;
use tracing::error;

use super::lookup::LookupError;
use crate::render;

#[derive(Debug, ThisError)]
pub enum ClinicaError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Roster import failed: {0}")]
    Roster(#[from] RosterError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Drug already present in the catalog")]
    DrugExists,

    #[error("Invalid form: {0}")]
    BadForm(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ClinicaError {
    fn status(&self) -> StatusCode {
        match self {
            ClinicaError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicaError::BadForm(_) | ClinicaError::Roster(_) => StatusCode::BAD_REQUEST,
            ClinicaError::UsernameTaken | ClinicaError::DrugExists => StatusCode::CONFLICT,
            ClinicaError::Lookup(_) => StatusCode::BAD_GATEWAY,
            ClinicaError::DatabaseError(_)
            | ClinicaError::RactorError(_)
            | ClinicaError::IoError(_)
            | ClinicaError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user.
    pub fn public_message(&self) -> String {
        match self {
            ClinicaError::NotFound(what) => format!("{what} non trovato."),
            ClinicaError::BadForm(msg) => msg.clone(),
            ClinicaError::Roster(e) => format!("Importazione annullata: {e}"),
            ClinicaError::UsernameTaken => "Nome utente già registrato.".to_string(),
            ClinicaError::DrugExists => "Farmaco già presente nel catalogo.".to_string(),
            ClinicaError::Lookup(_) => "Servizio esterno non disponibile.".to_string(),
            ClinicaError::DatabaseError(_)
            | ClinicaError::RactorError(_)
            | ClinicaError::IoError(_)
            | ClinicaError::UnexpectedError(_) => "Si è verificato un errore interno.".to_string(),
        }
    }
}

impl IntoResponse for ClinicaError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, render::error_page(status, &self.public_message())).into_response()
    }
}
