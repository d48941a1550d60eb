use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbDoctor {
    pub id: i64,
    pub username: String,
    /// PHC-like string produced by `auth::hash_password`.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub doctor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: String,
    pub medical_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbPatient {
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() {
            self.last_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Entry of the local drug catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbDrug {
    pub id: i64,
    pub name: String,
    pub active_ingredient: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A drug prescribed to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbPrescription {
    pub id: i64,
    pub patient_id: i64,
    pub drug_name: String,
    pub dosage: String,
    pub notes: String,
    pub prescribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbVisit {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub visit_date: NaiveDate,
    pub reason: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
