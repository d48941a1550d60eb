//! Server-side HTML.
//!
//! Pages are plain `format!` templates around a shared layout. Every value
//! that comes from a user or an upstream goes through [`escape`].

mod auth;
mod drugs;
mod info;
mod patients;

pub use auth::{RegisterValues, login_page, register_page};
pub use drugs::{drug_form_page, drugs_page, search_results_page};
pub use info::{CalcResult, calcoli_page, contatti_page, index_page, processo_page};
pub use patients::{import_page, new_patient_page, patient_detail_page, patients_page};

use axum::http::StatusCode;
use axum::response::Html;

use crate::db::DbDoctor;

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,'Segoe UI',Roboto,sans-serif;margin:0;background:#f7f7f5;color:#1c1917}\
header{background:#0f766e;color:#fff;padding:12px 24px;display:flex;gap:16px;align-items:center;flex-wrap:wrap}\
header a{color:#fff;text-decoration:none}\
header form{margin:0 0 0 auto}\
main{max-width:880px;margin:24px auto;padding:0 16px}\
.card{background:#fff;border-radius:12px;box-shadow:0 2px 12px rgba(0,0,0,.06);padding:20px;margin-bottom:16px}\
.error{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;padding:10px 14px;border-radius:8px}\
label{display:block;margin:8px 0 4px;font-weight:600}\
input,select,textarea{width:100%;padding:8px;border:1px solid #d6d3d1;border-radius:6px;box-sizing:border-box}\
button{background:#0f766e;color:#fff;border:0;border-radius:6px;padding:8px 16px;margin-top:12px;cursor:pointer}\
button.danger{background:#b91c1c}\
table{width:100%;border-collapse:collapse}td,th{padding:6px;border-bottom:1px solid #e7e5e4;text-align:left}";

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nav(doctor: Option<&DbDoctor>) -> String {
    let common = r#"<a href="/"><strong>Clinica</strong></a><a href="/processo">Processo</a><a href="/calcoli">Calcoli</a><a href="/contatti">Contatti</a>"#;
    match doctor {
        Some(d) => format!(
            r#"{common}<a href="/patients">Pazienti</a><a href="/drugs">Farmaci</a><a href="/aggiungi_farmaco">Aggiungi farmaco</a>
<form method="post" action="/logout"><span>Dr. {name}</span> <button type="submit">Esci</button></form>"#,
            name = escape(display_doctor(d)),
        ),
        None => format!(r#"{common}<a href="/login">Accedi</a><a href="/register">Registrati</a>"#),
    }
}

fn display_doctor(d: &DbDoctor) -> &str {
    if d.full_name.trim().is_empty() {
        &d.username
    } else {
        &d.full_name
    }
}

fn error_box(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

/// Wraps page content in the shared layout.
fn layout(title: &str, doctor: Option<&DbDoctor>, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="it">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Clinica</title>
<style>{STYLE}</style>
</head>
<body>
<header>{nav}</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(doctor),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Errore");
    layout(
        title,
        None,
        &format!(
            r#"<div class="card"><h1>{code} · {title}</h1>{error}<p><a href="/">Torna alla pagina iniziale</a></p></div>"#,
            code = status.as_u16(),
            title = escape(title),
            error = error_box(Some(message)),
        ),
    )
}

pub fn not_found_page() -> Html<String> {
    error_page(StatusCode::NOT_FOUND, "Pagina non trovata.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x&y")</script>'"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;&#39;"
        );
    }

    #[test]
    fn error_page_shows_status_and_escaped_message() {
        let Html(page) = error_page(StatusCode::BAD_REQUEST, "<b>campo</b> mancante");
        assert!(page.contains("400"));
        assert!(page.contains("&lt;b&gt;campo&lt;/b&gt; mancante"));
        assert!(page.contains(r#"href="/login""#));
    }
}
