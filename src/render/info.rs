use axum::response::Html;

use super::{error_box, escape, layout};
use crate::db::DbDoctor;

pub fn index_page(doctor: Option<&DbDoctor>, error: Option<&str>, query: &str) -> Html<String> {
    let search = if doctor.is_some() {
        format!(
            r#"<form method="post" action="/search">
<label for="query">Nome del farmaco o principio attivo</label>
<input id="query" name="query" value="{query}" placeholder="es. paracetamolo">
<button type="submit">Cerca</button>
</form>"#,
            query = escape(query),
        )
    } else {
        r#"<p><a href="/login">Accedi</a> per cercare farmaci e gestire i tuoi pazienti.</p>"#
            .to_string()
    };
    layout(
        "Ricerca farmaci",
        doctor,
        &format!(
            r#"<div class="card">
<h1>Ricerca farmaci</h1>
<p>Cerca prima nel catalogo locale, poi su PubChem e infine su Wikipedia.</p>
{error}
{search}
</div>"#,
            error = error_box(error),
        ),
    )
}

pub fn processo_page(doctor: Option<&DbDoctor>) -> Html<String> {
    layout(
        "Processo",
        doctor,
        r#"<div class="card">
<h1>Il processo di ricerca</h1>
<ol>
<li>Il nome inserito viene cercato nel catalogo locale dei farmaci, per nome commerciale o principio attivo.</li>
<li>Se non ci sono risultati, viene interrogato PubChem per formula, peso molecolare e struttura.</li>
<li>Se PubChem non conosce il composto, viene mostrato il riassunto della voce di Wikipedia.</li>
<li>Le risposte dei servizi esterni restano in memoria per un'ora.</li>
</ol>
</div>"#,
    )
}

pub fn contatti_page(doctor: Option<&DbDoctor>) -> Html<String> {
    layout(
        "Contatti",
        doctor,
        r#"<div class="card">
<h1>Contatti</h1>
<p>Per assistenza sull'applicazione scrivere a <a href="mailto:supporto@clinica.example">supporto@clinica.example</a>.</p>
<p>I dati mostrati hanno scopo informativo e non sostituiscono il foglietto illustrativo del farmaco.</p>
</div>"#,
    )
}

/// Outcome of a calculator submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalcResult {
    pub bmi: Option<(f64, &'static str)>,
    pub dose_mg: Option<f64>,
    pub error: Option<String>,
}

pub fn calcoli_page(doctor: Option<&DbDoctor>, result: Option<&CalcResult>) -> Html<String> {
    let mut output = String::new();
    if let Some(result) = result {
        output.push_str(&error_box(result.error.as_deref()));
        if let Some((bmi, category)) = result.bmi {
            output.push_str(&format!(
                "<p>BMI: <strong>{bmi:.1}</strong> ({category})</p>"
            ));
        }
        if let Some(dose) = result.dose_mg {
            output.push_str(&format!("<p>Dose totale: <strong>{dose:.1} mg</strong></p>"));
        }
    }
    layout(
        "Calcoli",
        doctor,
        &format!(
            r#"<div class="card">
<h1>Calcoli clinici</h1>
{output}
<form method="post" action="/calcoli">
<label for="weight_kg">Peso (kg)</label>
<input id="weight_kg" name="weight_kg" inputmode="decimal">
<label for="height_cm">Altezza (cm)</label>
<input id="height_cm" name="height_cm" inputmode="decimal">
<label for="mg_per_kg">Dose (mg/kg)</label>
<input id="mg_per_kg" name="mg_per_kg" inputmode="decimal">
<button type="submit">Calcola</button>
</form>
</div>"#
        ),
    )
}
