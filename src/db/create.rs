use chrono::NaiveDate;
use clinica_import::PatientRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCreate {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientCreate {
    pub doctor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: String,
    pub medical_notes: String,
}

impl PatientCreate {
    /// Roster rows carry no birth date; it stays unset rather than a placeholder.
    pub fn from_record(doctor_id: i64, record: &PatientRecord) -> Self {
        Self {
            doctor_id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            birth_date: None,
            sex: record.sex.clone(),
            medical_notes: record.medical_notes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrugCreate {
    pub name: String,
    pub active_ingredient: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrescriptionCreate {
    pub patient_id: i64,
    pub drug_name: String,
    pub dosage: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitCreate {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub visit_date: NaiveDate,
    pub reason: String,
    pub notes: String,
}
