mod common;

use clinica::ClinicaError;
use clinica::db::{DoctorCreate, DrugCreate, PatientCreate, PatientPatch, PrescriptionCreate};
use common::*;
use std::fs;

#[tokio::test]
async fn doctor_usernames_are_unique() {
    let (db, path) = spawn_db("db-doctors").await;

    let id = create_doctor(&db, "rossi").await;
    let doctor = db.get_doctor(id).await.unwrap().expect("doctor exists");
    assert_eq!(doctor.username, "rossi");
    assert!(db.get_doctor(id + 100).await.unwrap().is_none());

    let err = db
        .create_doctor(DoctorCreate {
            username: "rossi".into(),
            password_hash: "x".into(),
            full_name: String::new(),
            specialty: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicaError::UsernameTaken));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn drug_catalog_search_and_uniqueness() {
    let (db, path) = spawn_db("db-drugs").await;

    for (name, ingredient) in [
        ("Tachipirina", "Paracetamolo"),
        ("Moment", "Ibuprofene"),
        ("Sconto 100%", "Placebo"),
    ] {
        db.create_drug(DrugCreate {
            name: name.into(),
            active_ingredient: ingredient.into(),
            description: String::new(),
        })
        .await
        .unwrap();
    }

    let err = db
        .create_drug(DrugCreate {
            name: "tachipirina".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicaError::DrugExists));

    let hits = db.search_drugs("paracet").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Tachipirina");

    let hits = db.search_drugs("MOM").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].active_ingredient, "Ibuprofene");

    // LIKE wildcards in the query match literally.
    let hits = db.search_drugs("%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Sconto 100%");

    assert!(db.search_drugs("aspirina").await.unwrap().is_empty());
    assert_eq!(db.list_drugs().await.unwrap().len(), 3);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn drug_search_folds_accented_letters() {
    let (db, path) = spawn_db("db-drugs-accents").await;

    db.create_drug(DrugCreate {
        name: "Èffe Forte".into(),
        active_ingredient: "Acido ÀLFA-lipoico".into(),
        description: String::new(),
    })
    .await
    .unwrap();

    let hits = db.search_drugs("èffe").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Èffe Forte");

    let hits = db.search_drugs("àlfa").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].active_ingredient, "Acido ÀLFA-lipoico");

    assert_eq!(db.search_drugs("ÈFFE FORTE").await.unwrap().len(), 1);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn patients_are_scoped_to_their_doctor() {
    let (db, path) = spawn_db("db-patients").await;
    let rossi = create_doctor(&db, "rossi").await;
    let bianchi = create_doctor(&db, "bianchi").await;

    let patient_id = db
        .create_patient(PatientCreate {
            doctor_id: rossi,
            first_name: "Carla".into(),
            last_name: "Fontana".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(db.get_patient(bianchi, patient_id).await.unwrap().is_none());
    let err = db
        .patch_patient(
            bianchi,
            patient_id,
            PatientPatch {
                first_name: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicaError::NotFound(_)));
    assert!(matches!(
        db.delete_patient(bianchi, patient_id).await,
        Err(ClinicaError::NotFound(_))
    ));

    db.patch_patient(
        rossi,
        patient_id,
        PatientPatch {
            medical_notes: Some("Controllo annuale".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let patient = db.get_patient(rossi, patient_id).await.unwrap().unwrap();
    assert_eq!(patient.first_name, "Carla");
    assert_eq!(patient.medical_notes, "Controllo annuale");
    assert!(patient.updated_at >= patient.created_at);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn deleting_a_patient_removes_its_drug_records() {
    let (db, path) = spawn_db("db-cascade").await;
    let doctor_id = create_doctor(&db, "rossi").await;
    let patient_id = db
        .create_patient(PatientCreate {
            doctor_id,
            last_name: "Galli".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let rx = db
        .create_prescription(PrescriptionCreate {
            patient_id,
            drug_name: "Amoxicillina".into(),
            dosage: "1 g x 2".into(),
            notes: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(db.list_prescriptions(patient_id).await.unwrap().len(), 1);

    assert!(matches!(
        db.delete_prescription(patient_id + 1, rx).await,
        Err(ClinicaError::NotFound(_))
    ));

    db.delete_patient(doctor_id, patient_id).await.unwrap();
    assert!(db.list_prescriptions(patient_id).await.unwrap().is_empty());
    assert!(db.list_patients(doctor_id).await.unwrap().is_empty());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn import_batch_is_atomic() {
    let (db, path) = spawn_db("db-import").await;
    let doctor_id = create_doctor(&db, "rossi").await;

    let good = PatientCreate {
        doctor_id,
        last_name: "Uno".into(),
        ..Default::default()
    };
    // Unknown doctor violates the foreign key and must roll back the whole batch.
    let orphan = PatientCreate {
        doctor_id: doctor_id + 1000,
        last_name: "Orfano".into(),
        ..Default::default()
    };
    assert!(db.import_patients(vec![good.clone(), orphan]).await.is_err());
    assert!(db.list_patients(doctor_id).await.unwrap().is_empty());

    assert_eq!(db.import_patients(vec![good]).await.unwrap(), 1);
    assert_eq!(db.list_patients(doctor_id).await.unwrap().len(), 1);

    let _ = fs::remove_file(&path);
}
