//! SQL DDL for initializing the database schema.
//! SQLite-first design; statements are idempotent and applied at every start.

/// SQLite schema includes:
/// - `doctors` (login accounts)
/// - `patients` (owned by one doctor)
/// - `drugs` (local drug catalog)
/// - `prescriptions` (drugs prescribed to a patient)
/// - `visits` (doctor/patient encounters)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Doctors
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL DEFAULT '',
    specialty TEXT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Patients (one owning doctor per row)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY NOT NULL,
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    birth_date TEXT NULL, -- YYYY-MM-DD
    sex TEXT NOT NULL DEFAULT '',
    medical_notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_patients_doctor ON patients(doctor_id);

-- ---------------------------------------------------------------------------
-- Local drug catalog
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS drugs (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    active_ingredient TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    -- Lowercased copies for search, SQLite LIKE folds ASCII only.
    name_folded TEXT NOT NULL DEFAULT '',
    active_ingredient_folded TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Drug records (prescriptions) of a patient
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS prescriptions (
    id INTEGER PRIMARY KEY NOT NULL,
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    drug_name TEXT NOT NULL,
    dosage TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    prescribed_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id);

-- ---------------------------------------------------------------------------
-- Visits
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY NOT NULL,
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    visit_date TEXT NOT NULL, -- YYYY-MM-DD
    reason TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id)
"#;
