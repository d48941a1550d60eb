//! Partial updates.
//!
//! `None` fields are left unchanged. Updates are always scoped to the owning
//! doctor, so a patch aimed at another doctor's patient affects no rows.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::ClinicaError;

/// Abstraction for applying a patch envelope to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ClinicaError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub medical_notes: Option<String>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A `PatientPatch` addressed to one patient of one doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub patch: PatientPatch,
}

#[async_trait]
impl DbPatchable for PatientUpdate {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ClinicaError> {
        let PatientPatch {
            first_name,
            last_name,
            birth_date,
            sex,
            medical_notes,
        } = self.patch.clone();
        let updated_at = Utc::now();

        let res = sqlx::query(
            r#"
            UPDATE patients
            SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                birth_date = COALESCE(?, birth_date),
                sex = COALESCE(?, sex),
                medical_notes = COALESCE(?, medical_notes),
                updated_at = ?
            WHERE id = ? AND doctor_id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(birth_date)
        .bind(sex)
        .bind(medical_notes)
        .bind(updated_at)
        .bind(self.patient_id)
        .bind(self.doctor_id)
        .execute(pool)
        .await?;

        let affected = res.rows_affected();
        debug!(
            table = "patients",
            id = self.patient_id,
            doctor_id = self.doctor_id,
            affected,
            updated_at = %updated_at,
            "db patch applied"
        );

        if affected == 0 {
            return Err(ClinicaError::NotFound("Paziente"));
        }
        Ok(())
    }
}
