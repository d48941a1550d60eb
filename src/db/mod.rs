//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `create.rs`: insert payloads
//! - `patch.rs`: partial updates and the `DbPatchable` contract
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `actor.rs`: the `DbActor` owning the pool, and its cloneable handle

pub mod actor;
pub mod create;
pub mod models;
pub mod patch;
pub mod schema;

pub use actor::{DbActorHandle, spawn};
pub use create::{DoctorCreate, DrugCreate, PatientCreate, PrescriptionCreate, VisitCreate};
pub use models::{DbDoctor, DbDrug, DbPatient, DbPrescription, DbVisit};
pub use patch::{DbPatchable, PatientPatch};
pub use schema::SQLITE_INIT;
