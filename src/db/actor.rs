use crate::db::create::{DoctorCreate, DrugCreate, PatientCreate, PrescriptionCreate, VisitCreate};
use crate::db::models::{DbDoctor, DbDrug, DbPatient, DbPrescription, DbVisit};
use crate::db::patch::{DbPatchable, PatientPatch, PatientUpdate};
use crate::db::schema::SQLITE_INIT;
use crate::error::ClinicaError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

type Reply<T> = RpcReplyPort<Result<T, ClinicaError>>;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Register a doctor and return its id.
    CreateDoctor(DoctorCreate, Reply<i64>),
    GetDoctor(i64, Reply<Option<DbDoctor>>),
    GetDoctorByUsername(String, Reply<Option<DbDoctor>>),

    /// Insert exactly one patient row and return its id.
    CreatePatient(PatientCreate, Reply<i64>),
    /// Patients of one doctor, ordered by name.
    ListPatients(i64, Reply<Vec<DbPatient>>),
    /// (doctor_id, patient_id); another doctor's patient reads as `None`.
    GetPatient(i64, i64, Reply<Option<DbPatient>>),
    PatchPatient(PatientUpdate, Reply<()>),
    DeletePatient(i64, i64, Reply<()>),
    /// Insert all rows in one transaction.
    ImportPatients(Vec<PatientCreate>, Reply<usize>),

    CreatePrescription(PrescriptionCreate, Reply<i64>),
    ListPrescriptions(i64, Reply<Vec<DbPrescription>>),
    /// (patient_id, prescription_id)
    DeletePrescription(i64, i64, Reply<()>),

    CreateDrug(DrugCreate, Reply<i64>),
    ListDrugs(Reply<Vec<DbDrug>>),
    /// Case-insensitive substring scan over name and active ingredient.
    SearchDrugs(String, Reply<Vec<DbDrug>>),

    CreateVisit(VisitCreate, Reply<i64>),
    /// (doctor_id, patient_id)
    ListVisits(i64, i64, Reply<Vec<DbVisit>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

fn rpc_failed(op: &str, e: impl std::fmt::Display) -> ClinicaError {
    ClinicaError::RactorError(format!("DbActor {op} RPC failed: {e}"))
}

impl DbActorHandle {
    pub async fn create_doctor(&self, create: DoctorCreate) -> Result<i64, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::CreateDoctor, create)
            .map_err(|e| rpc_failed("CreateDoctor", e))?
    }

    pub async fn get_doctor(&self, id: i64) -> Result<Option<DbDoctor>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::GetDoctor, id)
            .map_err(|e| rpc_failed("GetDoctor", e))?
    }

    pub async fn get_doctor_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DbDoctor>, ClinicaError> {
        ractor::call!(
            self.actor,
            DbActorMessage::GetDoctorByUsername,
            username.to_string()
        )
        .map_err(|e| rpc_failed("GetDoctorByUsername", e))?
    }

    pub async fn create_patient(&self, create: PatientCreate) -> Result<i64, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::CreatePatient, create)
            .map_err(|e| rpc_failed("CreatePatient", e))?
    }

    pub async fn list_patients(&self, doctor_id: i64) -> Result<Vec<DbPatient>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::ListPatients, doctor_id)
            .map_err(|e| rpc_failed("ListPatients", e))?
    }

    pub async fn get_patient(
        &self,
        doctor_id: i64,
        patient_id: i64,
    ) -> Result<Option<DbPatient>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::GetPatient, doctor_id, patient_id)
            .map_err(|e| rpc_failed("GetPatient", e))?
    }

    pub async fn patch_patient(
        &self,
        doctor_id: i64,
        patient_id: i64,
        patch: PatientPatch,
    ) -> Result<(), ClinicaError> {
        let update = PatientUpdate {
            doctor_id,
            patient_id,
            patch,
        };
        ractor::call!(self.actor, DbActorMessage::PatchPatient, update)
            .map_err(|e| rpc_failed("PatchPatient", e))?
    }

    pub async fn delete_patient(&self, doctor_id: i64, patient_id: i64) -> Result<(), ClinicaError> {
        ractor::call!(
            self.actor,
            DbActorMessage::DeletePatient,
            doctor_id,
            patient_id
        )
        .map_err(|e| rpc_failed("DeletePatient", e))?
    }

    pub async fn import_patients(&self, rows: Vec<PatientCreate>) -> Result<usize, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::ImportPatients, rows)
            .map_err(|e| rpc_failed("ImportPatients", e))?
    }

    pub async fn create_prescription(
        &self,
        create: PrescriptionCreate,
    ) -> Result<i64, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::CreatePrescription, create)
            .map_err(|e| rpc_failed("CreatePrescription", e))?
    }

    pub async fn list_prescriptions(
        &self,
        patient_id: i64,
    ) -> Result<Vec<DbPrescription>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::ListPrescriptions, patient_id)
            .map_err(|e| rpc_failed("ListPrescriptions", e))?
    }

    pub async fn delete_prescription(
        &self,
        patient_id: i64,
        prescription_id: i64,
    ) -> Result<(), ClinicaError> {
        ractor::call!(
            self.actor,
            DbActorMessage::DeletePrescription,
            patient_id,
            prescription_id
        )
        .map_err(|e| rpc_failed("DeletePrescription", e))?
    }

    pub async fn create_drug(&self, create: DrugCreate) -> Result<i64, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::CreateDrug, create)
            .map_err(|e| rpc_failed("CreateDrug", e))?
    }

    pub async fn list_drugs(&self) -> Result<Vec<DbDrug>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::ListDrugs)
            .map_err(|e| rpc_failed("ListDrugs", e))?
    }

    pub async fn search_drugs(&self, query: &str) -> Result<Vec<DbDrug>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::SearchDrugs, query.to_string())
            .map_err(|e| rpc_failed("SearchDrugs", e))?
    }

    pub async fn create_visit(&self, create: VisitCreate) -> Result<i64, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::CreateVisit, create)
            .map_err(|e| rpc_failed("CreateVisit", e))?
    }

    pub async fn list_visits(
        &self,
        doctor_id: i64,
        patient_id: i64,
    ) -> Result<Vec<DbVisit>, ClinicaError> {
        ractor::call!(self.actor, DbActorMessage::ListVisits, doctor_id, patient_id)
            .map_err(|e| rpc_failed("ListVisits", e))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::CreateDoctor(create, reply) => {
                let _ = reply.send(create_doctor(pool, create).await);
            }
            DbActorMessage::GetDoctor(id, reply) => {
                let _ = reply.send(get_doctor(pool, id).await);
            }
            DbActorMessage::GetDoctorByUsername(username, reply) => {
                let _ = reply.send(get_doctor_by_username(pool, &username).await);
            }
            DbActorMessage::CreatePatient(create, reply) => {
                let _ = reply.send(create_patient(pool, &create).await);
            }
            DbActorMessage::ListPatients(doctor_id, reply) => {
                let _ = reply.send(list_patients(pool, doctor_id).await);
            }
            DbActorMessage::GetPatient(doctor_id, patient_id, reply) => {
                let _ = reply.send(get_patient(pool, doctor_id, patient_id).await);
            }
            DbActorMessage::PatchPatient(update, reply) => {
                let _ = reply.send(update.apply_patch(pool).await);
            }
            DbActorMessage::DeletePatient(doctor_id, patient_id, reply) => {
                let _ = reply.send(delete_patient(pool, doctor_id, patient_id).await);
            }
            DbActorMessage::ImportPatients(rows, reply) => {
                let _ = reply.send(import_patients(pool, rows).await);
            }
            DbActorMessage::CreatePrescription(create, reply) => {
                let _ = reply.send(create_prescription(pool, create).await);
            }
            DbActorMessage::ListPrescriptions(patient_id, reply) => {
                let _ = reply.send(list_prescriptions(pool, patient_id).await);
            }
            DbActorMessage::DeletePrescription(patient_id, prescription_id, reply) => {
                let _ = reply.send(delete_prescription(pool, patient_id, prescription_id).await);
            }
            DbActorMessage::CreateDrug(create, reply) => {
                let _ = reply.send(create_drug(pool, create).await);
            }
            DbActorMessage::ListDrugs(reply) => {
                let _ = reply.send(list_drugs(pool).await);
            }
            DbActorMessage::SearchDrugs(query, reply) => {
                let _ = reply.send(search_drugs(pool, &query).await);
            }
            DbActorMessage::CreateVisit(create, reply) => {
                let _ = reply.send(create_visit(pool, create).await);
            }
            DbActorMessage::ListVisits(doctor_id, patient_id, reply) => {
                let _ = reply.send(list_visits(pool, doctor_id, patient_id).await);
            }
        }
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

async fn create_doctor(pool: &SqlitePool, c: DoctorCreate) -> Result<i64, ClinicaError> {
    let res: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO doctors (username, password_hash, full_name, specialty, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(c.username)
    .bind(c.password_hash)
    .bind(c.full_name)
    .bind(c.specialty)
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match res {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(ClinicaError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

async fn get_doctor(pool: &SqlitePool, id: i64) -> Result<Option<DbDoctor>, ClinicaError> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, username, password_hash, full_name, specialty, created_at
        FROM doctors
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

async fn get_doctor_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<DbDoctor>, ClinicaError> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, username, password_hash, full_name, specialty, created_at
        FROM doctors
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Generic over the executor so the import transaction can reuse it.
async fn insert_patient<'e, E>(executor: E, c: &PatientCreate) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let now = Utc::now();
    sqlx::query_scalar(
        r#"
        INSERT INTO patients (
            doctor_id, first_name, last_name, birth_date, sex, medical_notes, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(c.doctor_id)
    .bind(&c.first_name)
    .bind(&c.last_name)
    .bind(c.birth_date)
    .bind(&c.sex)
    .bind(&c.medical_notes)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

async fn create_patient(pool: &SqlitePool, c: &PatientCreate) -> Result<i64, ClinicaError> {
    Ok(insert_patient(pool, c).await?)
}

async fn list_patients(pool: &SqlitePool, doctor_id: i64) -> Result<Vec<DbPatient>, ClinicaError> {
    let rows = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, doctor_id, first_name, last_name, birth_date, sex, medical_notes, created_at, updated_at
        FROM patients
        WHERE doctor_id = ?
        ORDER BY last_name COLLATE NOCASE, first_name COLLATE NOCASE, id
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn get_patient(
    pool: &SqlitePool,
    doctor_id: i64,
    patient_id: i64,
) -> Result<Option<DbPatient>, ClinicaError> {
    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, doctor_id, first_name, last_name, birth_date, sex, medical_notes, created_at, updated_at
        FROM patients
        WHERE id = ? AND doctor_id = ?
        "#,
    )
    .bind(patient_id)
    .bind(doctor_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

async fn delete_patient(
    pool: &SqlitePool,
    doctor_id: i64,
    patient_id: i64,
) -> Result<(), ClinicaError> {
    let res = sqlx::query("DELETE FROM patients WHERE id = ? AND doctor_id = ?")
        .bind(patient_id)
        .bind(doctor_id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(ClinicaError::NotFound("Paziente"));
    }
    Ok(())
}

async fn import_patients(pool: &SqlitePool, rows: Vec<PatientCreate>) -> Result<usize, ClinicaError> {
    let mut tx = pool.begin().await?;
    for row in &rows {
        insert_patient(&mut *tx, row).await?;
    }
    tx.commit().await?;

    debug!(count = rows.len(), "patients imported");
    Ok(rows.len())
}

async fn create_prescription(
    pool: &SqlitePool,
    c: PrescriptionCreate,
) -> Result<i64, ClinicaError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO prescriptions (patient_id, drug_name, dosage, notes, prescribed_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(c.patient_id)
    .bind(c.drug_name)
    .bind(c.dosage)
    .bind(c.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn list_prescriptions(
    pool: &SqlitePool,
    patient_id: i64,
) -> Result<Vec<DbPrescription>, ClinicaError> {
    let rows = sqlx::query_as::<_, DbPrescription>(
        r#"
        SELECT id, patient_id, drug_name, dosage, notes, prescribed_at
        FROM prescriptions
        WHERE patient_id = ?
        ORDER BY prescribed_at DESC, id DESC
        "#,
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn delete_prescription(
    pool: &SqlitePool,
    patient_id: i64,
    prescription_id: i64,
) -> Result<(), ClinicaError> {
    let res = sqlx::query("DELETE FROM prescriptions WHERE id = ? AND patient_id = ?")
        .bind(prescription_id)
        .bind(patient_id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(ClinicaError::NotFound("Farmaco prescritto"));
    }
    Ok(())
}

async fn create_drug(pool: &SqlitePool, c: DrugCreate) -> Result<i64, ClinicaError> {
    let res: Result<i64, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO drugs (
            name, active_ingredient, description,
            name_folded, active_ingredient_folded, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&c.name)
    .bind(&c.active_ingredient)
    .bind(c.description)
    .bind(c.name.to_lowercase())
    .bind(c.active_ingredient.to_lowercase())
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match res {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(ClinicaError::DrugExists),
        Err(e) => Err(e.into()),
    }
}

async fn list_drugs(pool: &SqlitePool) -> Result<Vec<DbDrug>, ClinicaError> {
    let rows = sqlx::query_as::<_, DbDrug>(
        r#"
        SELECT id, name, active_ingredient, description, created_at
        FROM drugs
        ORDER BY name COLLATE NOCASE
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn search_drugs(pool: &SqlitePool, query: &str) -> Result<Vec<DbDrug>, ClinicaError> {
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    let rows = sqlx::query_as::<_, DbDrug>(
        r#"
        SELECT id, name, active_ingredient, description, created_at
        FROM drugs
        WHERE name_folded LIKE ?1 ESCAPE '\'
           OR active_ingredient_folded LIKE ?1 ESCAPE '\'
        ORDER BY name COLLATE NOCASE
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn create_visit(pool: &SqlitePool, c: VisitCreate) -> Result<i64, ClinicaError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO visits (doctor_id, patient_id, visit_date, reason, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(c.doctor_id)
    .bind(c.patient_id)
    .bind(c.visit_date)
    .bind(c.reason)
    .bind(c.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn list_visits(
    pool: &SqlitePool,
    doctor_id: i64,
    patient_id: i64,
) -> Result<Vec<DbVisit>, ClinicaError> {
    let rows = sqlx::query_as::<_, DbVisit>(
        r#"
        SELECT id, doctor_id, patient_id, visit_date, reason, notes, created_at
        FROM visits
        WHERE doctor_id = ? AND patient_id = ?
        ORDER BY visit_date DESC, id DESC
        "#,
    )
    .bind(doctor_id)
    .bind(patient_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Escapes `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several databases can coexist in one process.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, ClinicaError> {
    let (actor, _jh) = ractor::Actor::spawn(
        None,
        DbActor,
        database_url.to_string(),
    )
    .await
    .map_err(|e| ClinicaError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), ClinicaError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
