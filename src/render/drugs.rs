use axum::response::Html;
use std::fmt::Write as _;

use super::{error_box, escape, layout};
use crate::db::{DbDoctor, DbDrug, DrugCreate};
use crate::lookup::{CompoundInfo, EncyclopediaSummary, SearchOutcome};

fn drug_table(drugs: &[DbDrug]) -> String {
    let mut rows = String::new();
    for d in drugs {
        let _ = write!(
            rows,
            "<tr><td>{name}</td><td>{ingredient}</td><td>{description}</td></tr>",
            name = escape(&d.name),
            ingredient = escape(&d.active_ingredient),
            description = escape(&d.description),
        );
    }
    format!(
        "<table><thead><tr><th>Nome</th><th>Principio attivo</th><th>Descrizione</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

pub fn drugs_page(doctor: &DbDoctor, drugs: &[DbDrug]) -> Html<String> {
    let body = if drugs.is_empty() {
        "<p>Il catalogo è vuoto.</p>".to_string()
    } else {
        drug_table(drugs)
    };
    layout(
        "Catalogo farmaci",
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>Catalogo locale</h1>
<p><a href="/aggiungi_farmaco">Aggiungi un farmaco</a></p>
{body}
</div>"#
        ),
    )
}

pub fn drug_form_page(doctor: &DbDoctor, error: Option<&str>, values: &DrugCreate) -> Html<String> {
    layout(
        "Aggiungi farmaco",
        Some(doctor),
        &format!(
            r#"<div class="card">
<h1>Aggiungi farmaco</h1>
{error}
<form method="post" action="/aggiungi_farmaco">
<label for="name">Nome</label>
<input id="name" name="name" value="{name}" required>
<label for="active_ingredient">Principio attivo</label>
<input id="active_ingredient" name="active_ingredient" value="{ingredient}">
<label for="description">Descrizione</label>
<textarea id="description" name="description" rows="4">{description}</textarea>
<button type="submit">Salva</button>
</form>
</div>"#,
            error = error_box(error),
            name = escape(&values.name),
            ingredient = escape(&values.active_ingredient),
            description = escape(&values.description),
        ),
    )
}

fn compound_card(c: &CompoundInfo) -> String {
    let row = |label: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|v| format!("<tr><th>{label}</th><td>{}</td></tr>", escape(v)))
            .unwrap_or_default()
    };
    format!(
        r#"<div class="card">
<h2>{query}</h2>
<p>Fonte: PubChem (CID {cid})</p>
<table>{formula}{weight}{iupac}{smiles}</table>
<img src="{image}" alt="Struttura di {query}" width="300">
</div>"#,
        query = escape(&c.query),
        cid = c.cid,
        formula = row("Formula", &c.molecular_formula),
        weight = row("Peso molecolare", &c.molecular_weight),
        iupac = row("Nome IUPAC", &c.iupac_name),
        smiles = row("SMILES", &c.canonical_smiles),
        image = escape(c.image_url.as_str()),
    )
}

fn encyclopedia_card(s: &EncyclopediaSummary) -> String {
    let description = s
        .description
        .as_deref()
        .map(|d| format!("<p><em>{}</em></p>", escape(d)))
        .unwrap_or_default();
    let thumbnail = s
        .thumbnail_url
        .as_deref()
        .map(|u| format!(r#"<img src="{}" alt="" width="200">"#, escape(u)))
        .unwrap_or_default();
    let link = s
        .page_url
        .as_deref()
        .map(|u| format!(r#"<p><a href="{}">Leggi su Wikipedia</a></p>"#, escape(u)))
        .unwrap_or_default();
    format!(
        r#"<div class="card">
<h2>{title}</h2>
<p>Fonte: Wikipedia</p>
{description}{thumbnail}
<p>{extract}</p>
{link}
</div>"#,
        title = escape(&s.title),
        extract = escape(&s.extract),
    )
}

/// Renders a successful search. Misses are shown on the index page instead.
pub fn search_results_page(doctor: &DbDoctor, query: &str, outcome: &SearchOutcome) -> Html<String> {
    let results = match outcome {
        SearchOutcome::Local(drugs) => format!(
            r#"<div class="card"><p>Fonte: catalogo locale</p>{}</div>"#,
            drug_table(drugs)
        ),
        SearchOutcome::PubChem(compound) => compound_card(compound),
        SearchOutcome::Encyclopedia(summary) => encyclopedia_card(summary),
        SearchOutcome::EmptyQuery | SearchOutcome::NotFound => {
            r#"<p class="error">Farmaco non trovato.</p>"#.to_string()
        }
    };
    layout(
        "Risultati",
        Some(doctor),
        &format!(
            r#"<h1>Risultati per «{query}»</h1>
{results}
<p><a href="/">Nuova ricerca</a></p>"#,
            query = escape(query),
        ),
    )
}
