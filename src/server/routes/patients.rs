use crate::db::{DbDoctor, PatientCreate, PatientPatch, PrescriptionCreate, VisitCreate};
use crate::error::ClinicaError;
use crate::import::import_roster;
use crate::render;
use crate::server::guards::RequireDoctor;
use crate::server::router::ClinicaState;
use crate::server::routes::non_blank;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

pub fn router() -> Router<ClinicaState> {
    Router::new()
        .route("/patients", get(list).post(create))
        .route("/patients/new", get(new_form))
        .route("/patients/import", get(import_form).post(import))
        .route("/patients/{id}", get(detail))
        .route("/patients/{id}/edit", post(edit))
        .route("/patients/{id}/delete", post(delete))
        .route("/patients/{id}/prescriptions", post(add_prescription))
        .route(
            "/patients/{id}/prescriptions/{pid}/delete",
            post(remove_prescription),
        )
        .route("/patients/{id}/visits", post(add_visit))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub sex: String,
    pub medical_notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrescriptionForm {
    pub drug_name: String,
    pub dosage: String,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VisitForm {
    pub visit_date: String,
    pub reason: String,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImportForm {
    pub roster: String,
}

/// `YYYY-MM-DD` as sent by `<input type="date">`; anything else is ignored.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

impl PatientForm {
    fn into_create(self, doctor_id: i64) -> PatientCreate {
        PatientCreate {
            doctor_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: parse_date(&self.birth_date),
            sex: self.sex.trim().to_string(),
            medical_notes: self.medical_notes.trim().to_string(),
        }
    }

    /// Blank fields leave the stored value unchanged.
    fn into_patch(self) -> PatientPatch {
        PatientPatch {
            first_name: non_blank(&self.first_name),
            last_name: non_blank(&self.last_name),
            birth_date: parse_date(&self.birth_date),
            sex: non_blank(&self.sex),
            medical_notes: non_blank(&self.medical_notes),
        }
    }
}

async fn owned_patient_exists(
    state: &ClinicaState,
    doctor: &DbDoctor,
    patient_id: i64,
) -> Result<(), ClinicaError> {
    state
        .db
        .get_patient(doctor.id, patient_id)
        .await?
        .map(|_| ())
        .ok_or(ClinicaError::NotFound("Paziente"))
}

fn to_detail(patient_id: i64) -> Redirect {
    Redirect::to(&format!("/patients/{patient_id}"))
}

async fn list(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
) -> Result<Html<String>, ClinicaError> {
    let patients = state.db.list_patients(doctor.id).await?;
    Ok(render::patients_page(&doctor, &patients))
}

async fn new_form(RequireDoctor(doctor): RequireDoctor) -> Html<String> {
    render::new_patient_page(&doctor, None)
}

async fn create(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Form(form): Form<PatientForm>,
) -> Result<Redirect, ClinicaError> {
    let patient_id = state.db.create_patient(form.into_create(doctor.id)).await?;
    info!(doctor_id = doctor.id, patient_id, "patient created");
    Ok(to_detail(patient_id))
}

async fn detail(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path(id): Path<i64>,
) -> Result<Html<String>, ClinicaError> {
    let patient = state
        .db
        .get_patient(doctor.id, id)
        .await?
        .ok_or(ClinicaError::NotFound("Paziente"))?;
    let prescriptions = state.db.list_prescriptions(patient.id).await?;
    let visits = state.db.list_visits(doctor.id, patient.id).await?;
    Ok(render::patient_detail_page(
        &doctor,
        &patient,
        &prescriptions,
        &visits,
    ))
}

async fn edit(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path(id): Path<i64>,
    Form(form): Form<PatientForm>,
) -> Result<Redirect, ClinicaError> {
    let patch = form.into_patch();
    if patch.is_empty() {
        owned_patient_exists(&state, &doctor, id).await?;
    } else {
        state.db.patch_patient(doctor.id, id, patch).await?;
        info!(doctor_id = doctor.id, patient_id = id, "patient updated");
    }
    Ok(to_detail(id))
}

async fn delete(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path(id): Path<i64>,
) -> Result<Redirect, ClinicaError> {
    state.db.delete_patient(doctor.id, id).await?;
    info!(doctor_id = doctor.id, patient_id = id, "patient deleted");
    Ok(Redirect::to("/patients"))
}

async fn add_prescription(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path(id): Path<i64>,
    Form(form): Form<PrescriptionForm>,
) -> Result<Redirect, ClinicaError> {
    owned_patient_exists(&state, &doctor, id).await?;
    let Some(drug_name) = non_blank(&form.drug_name) else {
        return Err(ClinicaError::BadForm(
            "Il nome del farmaco è obbligatorio.".to_string(),
        ));
    };
    let create = PrescriptionCreate {
        patient_id: id,
        drug_name,
        dosage: form.dosage.trim().to_string(),
        notes: form.notes.trim().to_string(),
    };
    let prescription_id = state.db.create_prescription(create).await?;
    info!(patient_id = id, prescription_id, "drug record added");
    Ok(to_detail(id))
}

async fn remove_prescription(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path((id, pid)): Path<(i64, i64)>,
) -> Result<Redirect, ClinicaError> {
    owned_patient_exists(&state, &doctor, id).await?;
    state.db.delete_prescription(id, pid).await?;
    Ok(to_detail(id))
}

async fn add_visit(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Path(id): Path<i64>,
    Form(form): Form<VisitForm>,
) -> Result<Redirect, ClinicaError> {
    owned_patient_exists(&state, &doctor, id).await?;
    let create = VisitCreate {
        doctor_id: doctor.id,
        patient_id: id,
        visit_date: parse_date(&form.visit_date).unwrap_or_else(|| Utc::now().date_naive()),
        reason: form.reason.trim().to_string(),
        notes: form.notes.trim().to_string(),
    };
    let visit_id = state.db.create_visit(create).await?;
    info!(doctor_id = doctor.id, patient_id = id, visit_id, "visit recorded");
    Ok(to_detail(id))
}

async fn import_form(RequireDoctor(doctor): RequireDoctor) -> Html<String> {
    render::import_page(&doctor, None, "")
}

async fn import(
    State(state): State<ClinicaState>,
    RequireDoctor(doctor): RequireDoctor,
    Form(form): Form<ImportForm>,
) -> Result<Response, ClinicaError> {
    match import_roster(&state.db, doctor.id, &form.roster).await {
        Ok(_) => Ok(Redirect::to("/patients").into_response()),
        Err(e @ ClinicaError::Roster(_)) => {
            let page = render::import_page(&doctor, Some(&e.public_message()), &form.roster);
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e),
    }
}
