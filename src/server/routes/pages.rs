use crate::calc::{bmi, bmi_category, weight_based_dose};
use crate::render::{self, CalcResult};
use crate::server::guards::MaybeDoctor;
use crate::server::router::ClinicaState;

use axum::{Form, Router, response::IntoResponse, routing::get};
use serde::Deserialize;

pub fn router() -> Router<ClinicaState> {
    Router::new()
        .route("/", get(index))
        .route("/processo", get(processo))
        .route("/contatti", get(contatti))
        .route("/calcoli", get(calcoli_form).post(calcoli))
        .route("/healthz", get(healthz))
}

async fn index(MaybeDoctor(doctor): MaybeDoctor) -> impl IntoResponse {
    render::index_page(doctor.as_ref(), None, "")
}

async fn processo(MaybeDoctor(doctor): MaybeDoctor) -> impl IntoResponse {
    render::processo_page(doctor.as_ref())
}

async fn contatti(MaybeDoctor(doctor): MaybeDoctor) -> impl IntoResponse {
    render::contatti_page(doctor.as_ref())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CalcForm {
    pub weight_kg: String,
    pub height_cm: String,
    pub mg_per_kg: String,
}

/// Accepts both `72.5` and `72,5`; anything unparsable reads as absent.
fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn compute(form: &CalcForm) -> CalcResult {
    let weight = parse_decimal(&form.weight_kg);
    let height = parse_decimal(&form.height_cm);
    let mg_per_kg = parse_decimal(&form.mg_per_kg);

    let bmi = weight
        .zip(height)
        .and_then(|(w, h)| bmi(w, h))
        .map(|value| (value, bmi_category(value)));
    let dose_mg = mg_per_kg
        .zip(weight)
        .and_then(|(dose, w)| weight_based_dose(dose, w));

    let error = (bmi.is_none() && dose_mg.is_none()).then(|| {
        "Inserisci peso e altezza (o peso e dose per kg) con valori positivi.".to_string()
    });

    CalcResult {
        bmi,
        dose_mg,
        error,
    }
}

async fn calcoli_form(MaybeDoctor(doctor): MaybeDoctor) -> impl IntoResponse {
    render::calcoli_page(doctor.as_ref(), None)
}

async fn calcoli(
    MaybeDoctor(doctor): MaybeDoctor,
    Form(form): Form<CalcForm>,
) -> impl IntoResponse {
    let result = compute(&form);
    render::calcoli_page(doctor.as_ref(), Some(&result))
}
