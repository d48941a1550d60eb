//! Roster import: parse everything first, then insert in one transaction.

use std::path::Path;

use tracing::info;

use crate::db::{DbActorHandle, PatientCreate};
use crate::error::ClinicaError;

/// Imports roster text for `doctor_id`. A malformed line aborts before anything is written.
pub async fn import_roster(
    db: &DbActorHandle,
    doctor_id: i64,
    input: &str,
) -> Result<usize, ClinicaError> {
    db.get_doctor(doctor_id)
        .await?
        .ok_or(ClinicaError::NotFound("Medico"))?;

    let records = clinica_import::parse_roster(input)?;
    let rows: Vec<PatientCreate> = records
        .iter()
        .map(|record| PatientCreate::from_record(doctor_id, record))
        .collect();

    let imported = db.import_patients(rows).await?;
    info!(doctor_id, imported, "roster imported");
    Ok(imported)
}

pub async fn import_roster_file(
    db: &DbActorHandle,
    doctor_id: i64,
    path: &Path,
) -> Result<usize, ClinicaError> {
    let input = tokio::fs::read_to_string(path).await?;
    info!(path = %path.display(), bytes = input.len(), "roster file loaded");
    import_roster(db, doctor_id, &input).await
}
