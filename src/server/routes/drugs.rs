use crate::db::DrugCreate;
use crate::error::ClinicaError;
use crate::lookup::SearchOutcome;
use crate::render;
use crate::server::guards::RequireDoctor;
use crate::server::router::ClinicaState;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

pub fn router() -> Router<ClinicaState> {
    Router::new()
        .route("/search", post(search))
        .route("/drugs", get(list))
        .route("/aggiungi_farmaco", get(add_form).post(add))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DrugForm {
    pub name: String,
    pub active_ingredient: String,
    pub description: String,
}

async fn search(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, ClinicaError> {
    let query = form.query.trim();
    let outcome = state.lookup.search(query).await?;
    let page = match outcome {
        SearchOutcome::EmptyQuery => {
            render::index_page(Some(&doctor), Some("Inserisci il nome di un farmaco."), "")
        }
        SearchOutcome::NotFound => {
            render::index_page(Some(&doctor), Some("Farmaco non trovato."), query)
        }
        found => render::search_results_page(&doctor, query, &found),
    };
    Ok(page)
}

async fn list(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
) -> Result<Html<String>, ClinicaError> {
    let drugs = state.db.list_drugs().await?;
    Ok(render::drugs_page(&doctor, &drugs))
}

async fn add_form(RequireDoctor(doctor): RequireDoctor) -> Html<String> {
    render::drug_form_page(&doctor, None, &DrugCreate::default())
}

async fn add(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Form(form): Form<DrugForm>,
) -> Result<Response, ClinicaError> {
    let create = DrugCreate {
        name: form.name.trim().to_string(),
        active_ingredient: form.active_ingredient.trim().to_string(),
        description: form.description.trim().to_string(),
    };

    if create.name.is_empty() {
        let page = render::drug_form_page(
            &doctor,
            Some("Il nome del farmaco è obbligatorio."),
            &create,
        );
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    match state.db.create_drug(create.clone()).await {
        Ok(drug_id) => {
            info!(drug_id, name = %create.name, "drug added to catalog");
            Ok(Redirect::to("/drugs").into_response())
        }
        Err(e @ ClinicaError::DrugExists) => {
            let page = render::drug_form_page(&doctor, Some(&e.public_message()), &create);
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(e) => Err(e),
    }
}
