mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::*;
use std::fs;

#[tokio::test]
async fn submitted_form_creates_one_patient_owned_by_the_doctor() {
    let (db, path) = spawn_db("patient-create").await;
    let app = build_app(&db, &unreachable_upstream());
    let rossi = create_doctor(&db, "rossi").await;
    let bianchi = create_doctor(&db, "bianchi").await;
    let cookie = login(&app, "rossi").await;

    let resp = send(
        &app,
        post_form(
            "/patients",
            Some(&cookie),
            &[
                ("first_name", "Giulia"),
                ("last_name", "Esposito"),
                ("birth_date", "1975-04-12"),
                ("sex", "F"),
                ("medical_notes", "Allergia: penicillina"),
            ],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let patients = db.list_patients(rossi).await.unwrap();
    assert_eq!(patients.len(), 1);
    let patient = &patients[0];
    assert_eq!(patient.doctor_id, rossi);
    assert_eq!(patient.first_name, "Giulia");
    assert_eq!(patient.last_name, "Esposito");
    assert_eq!(patient.birth_date.map(|d| d.to_string()).as_deref(), Some("1975-04-12"));
    assert_eq!(location(&resp), format!("/patients/{}", patient.id));
    assert!(db.list_patients(bianchi).await.unwrap().is_empty());

    // Missing fields fall back to defaults.
    let resp = send(
        &app,
        post_form("/patients", Some(&cookie), &[("last_name", "Solo")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let patients = db.list_patients(rossi).await.unwrap();
    assert_eq!(patients.len(), 2);
    let solo = patients
        .iter()
        .find(|p| p.last_name == "Solo")
        .expect("second patient");
    assert_eq!(solo.first_name, "");
    assert_eq!(solo.birth_date, None);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn doctors_cannot_reach_each_others_patients() {
    let (db, path) = spawn_db("patient-isolation").await;
    let app = build_app(&db, &unreachable_upstream());
    create_doctor(&db, "rossi").await;
    create_doctor(&db, "bianchi").await;
    let rossi = login(&app, "rossi").await;
    let bianchi = login(&app, "bianchi").await;

    let resp = send(
        &app,
        post_form("/patients", Some(&rossi), &[("first_name", "Marco"), ("last_name", "Gallo")]),
    )
    .await;
    let detail = location(&resp).to_string();

    let resp = send(&app, get(&detail, Some(&rossi))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Marco Gallo"));

    let resp = send(&app, get(&detail, Some(&bianchi))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for action in ["edit", "delete", "prescriptions", "visits"] {
        let resp = send(
            &app,
            post_form(
                &format!("{detail}/{action}"),
                Some(&bianchi),
                &[("first_name", "Hacked"), ("drug_name", "X")],
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "POST {action}");
    }

    let resp = send(&app, get(&detail, Some(&rossi))).await;
    let body = body_string(resp).await;
    assert!(body.contains("Marco Gallo"));
    assert!(!body.contains("Hacked"));

    let resp = send(&app, get("/patients/999999", Some(&rossi))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn detail_page_manages_drugs_visits_and_edits() {
    let (db, path) = spawn_db("patient-detail").await;
    let app = build_app(&db, &unreachable_upstream());
    let doctor_id = create_doctor(&db, "rossi").await;
    let cookie = login(&app, "rossi").await;

    let resp = send(
        &app,
        post_form(
            "/patients",
            Some(&cookie),
            &[("first_name", "Paolo"), ("last_name", "Ricci"), ("sex", "M")],
        ),
    )
    .await;
    let detail = location(&resp).to_string();
    let patient_id = db.list_patients(doctor_id).await.unwrap()[0].id;

    // Blank fields leave the stored values alone.
    let resp = send(
        &app,
        post_form(
            &format!("{detail}/edit"),
            Some(&cookie),
            &[("first_name", ""), ("last_name", "Ricci-Neri"), ("sex", "")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let patient = db.get_patient(doctor_id, patient_id).await.unwrap().unwrap();
    assert_eq!(patient.first_name, "Paolo");
    assert_eq!(patient.last_name, "Ricci-Neri");
    assert_eq!(patient.sex, "M");

    let resp = send(
        &app,
        post_form(&format!("{detail}/prescriptions"), Some(&cookie), &[("drug_name", " ")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        post_form(
            &format!("{detail}/prescriptions"),
            Some(&cookie),
            &[("drug_name", "Ramipril"), ("dosage", "5 mg/die")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let prescriptions = db.list_prescriptions(patient_id).await.unwrap();
    assert_eq!(prescriptions.len(), 1);
    assert_eq!(prescriptions[0].drug_name, "Ramipril");

    let resp = send(
        &app,
        post_form(&format!("{detail}/visits"), Some(&cookie), &[("reason", "Controllo")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let visits = db.list_visits(doctor_id, patient_id).await.unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].visit_date, Utc::now().date_naive());

    let resp = send(&app, get(&detail, Some(&cookie))).await;
    let body = body_string(resp).await;
    assert!(body.contains("Ramipril"));
    assert!(body.contains("5 mg/die"));
    assert!(body.contains("Controllo"));

    let resp = send(
        &app,
        post_form(
            &format!("{detail}/prescriptions/{}/delete", prescriptions[0].id),
            Some(&cookie),
            &[],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(db.list_prescriptions(patient_id).await.unwrap().is_empty());

    let resp = send(&app, post_form(&format!("{detail}/delete"), Some(&cookie), &[])).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/patients");
    assert!(db.list_patients(doctor_id).await.unwrap().is_empty());

    let _ = fs::remove_file(&path);
}
