use axum::response::Html;
use std::fmt::Write as _;

use super::{error_box, escape, layout};
use crate::db::{DbDoctor, DbPatient, DbPrescription, DbVisit};

fn birth_date_text(patient: &DbPatient) -> String {
    patient
        .birth_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn patients_page(doctor: &DbDoctor, patients: &[DbPatient]) -> Html<String> {
    let mut rows = String::new();
    for p in patients {
        let _ = write!(
            rows,
            r#"<tr><td><a href="/patients/{id}">{name}</a></td><td>{birth}</td><td>{sex}</td></tr>"#,
            id = p.id,
            name = escape(&p.display_name()),
            birth = birth_date_text(p),
            sex = escape(&p.sex),
        );
    }
    let table = if patients.is_empty() {
        "<p>Nessun paziente registrato.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>Paziente</th><th>Nascita</th><th>Sesso</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };
    layout(
        "Pazienti",
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>I miei pazienti ({count})</h1>
<p><a href="/patients/new">Nuovo paziente</a> · <a href="/patients/import">Importa elenco</a></p>
{table}
</div>"#,
            count = patients.len(),
        ),
    )
}

pub fn new_patient_page(doctor: &DbDoctor, error: Option<&str>) -> Html<String> {
    layout(
        "Nuovo paziente",
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>Nuovo paziente</h1>
{error}
<form method="post" action="/patients">
{fields}
<button type="submit">Salva</button>
</form>
</div>"#,
            error = error_box(error),
            fields = patient_fields(None),
        ),
    )
}

fn patient_fields(patient: Option<&DbPatient>) -> String {
    let value = |v: Option<String>| v.as_deref().map(escape).unwrap_or_default();
    format!(
        r#"<label for="first_name">Nome</label>
<input id="first_name" name="first_name" value="{first}">
<label for="last_name">Cognome</label>
<input id="last_name" name="last_name" value="{last}">
<label for="birth_date">Data di nascita</label>
<input id="birth_date" name="birth_date" type="date" value="{birth}">
<label for="sex">Sesso</label>
<input id="sex" name="sex" value="{sex}">
<label for="medical_notes">Note cliniche</label>
<textarea id="medical_notes" name="medical_notes" rows="4">{notes}</textarea>"#,
        first = value(patient.map(|p| p.first_name.clone())),
        last = value(patient.map(|p| p.last_name.clone())),
        birth = value(patient.and_then(|p| p.birth_date).map(|d| d.to_string())),
        sex = value(patient.map(|p| p.sex.clone())),
        notes = value(patient.map(|p| p.medical_notes.clone())),
    )
}

pub fn patient_detail_page(
    doctor: &DbDoctor,
    patient: &DbPatient,
    prescriptions: &[DbPrescription],
    visits: &[DbVisit],
) -> Html<String> {
    let id = patient.id;

    let mut drug_rows = String::new();
    for rx in prescriptions {
        let _ = write!(
            drug_rows,
            r#"<tr><td>{name}</td><td>{dosage}</td><td>{notes}</td><td>{date}</td>
<td><form method="post" action="/patients/{id}/prescriptions/{rx_id}/delete"><button class="danger" type="submit">Rimuovi</button></form></td></tr>"#,
            name = escape(&rx.drug_name),
            dosage = escape(&rx.dosage),
            notes = escape(&rx.notes),
            date = rx.prescribed_at.format("%d/%m/%Y"),
            rx_id = rx.id,
        );
    }

    let mut visit_rows = String::new();
    for v in visits {
        let _ = write!(
            visit_rows,
            "<tr><td>{date}</td><td>{reason}</td><td>{notes}</td></tr>",
            date = v.visit_date.format("%d/%m/%Y"),
            reason = escape(&v.reason),
            notes = escape(&v.notes),
        );
    }

    layout(
        &patient.display_name(),
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>{name}</h1>
<p>Nascita: {birth} · Sesso: {sex}</p>
<p>{notes}</p>
</div>
<div class="card">
<h2>Farmaci</h2>
<table><thead><tr><th>Farmaco</th><th>Dosaggio</th><th>Note</th><th>Data</th><th></th></tr></thead><tbody>{drug_rows}</tbody></table>
<form method="post" action="/patients/{id}/prescriptions">
<label for="drug_name">Farmaco</label>
<input id="drug_name" name="drug_name" required>
<label for="dosage">Dosaggio</label>
<input id="dosage" name="dosage">
<label for="rx_notes">Note</label>
<input id="rx_notes" name="notes">
<button type="submit">Aggiungi farmaco</button>
</form>
</div>
<div class="card">
<h2>Visite</h2>
<table><thead><tr><th>Data</th><th>Motivo</th><th>Note</th></tr></thead><tbody>{visit_rows}</tbody></table>
<form method="post" action="/patients/{id}/visits">
<label for="visit_date">Data</label>
<input id="visit_date" name="visit_date" type="date">
<label for="reason">Motivo</label>
<input id="reason" name="reason">
<label for="visit_notes">Note</label>
<input id="visit_notes" name="notes">
<button type="submit">Registra visita</button>
</form>
</div>
<div class="card">
<h2>Modifica dati</h2>
<form method="post" action="/patients/{id}/edit">
{fields}
<button type="submit">Aggiorna</button>
</form>
<form method="post" action="/patients/{id}/delete">
<button class="danger" type="submit">Elimina paziente</button>
</form>
</div>"#,
            name = escape(&patient.display_name()),
            birth = birth_date_text(patient),
            sex = escape(&patient.sex),
            notes = escape(&patient.medical_notes),
            fields = patient_fields(Some(patient)),
        ),
    )
}

pub fn import_page(doctor: &DbDoctor, error: Option<&str>, roster: &str) -> Html<String> {
    layout(
        "Importa pazienti",
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>Importa elenco pazienti</h1>
<p>Una riga per paziente, ad esempio:<br><code>Mario Rossi, 45 anni, M, Peso: 82.5 kg, Altezza: 178 cm, BMI: 26.0, Dieta: Mediterranea, Allergia: Nessuna, Patologia: Ipertensione, Farmaco: Ramipril</code></p>
{error}
<form method="post" action="/patients/import">
<label for="roster">Elenco</label>
<textarea id="roster" name="roster" rows="12">{roster}</textarea>
<button type="submit">Importa</button>
</form>
</div>"#,
            error = error_box(error),
            roster = escape(roster),
        ),
    )
}
