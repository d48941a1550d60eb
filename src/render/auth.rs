use axum::response::Html;

use super::{error_box, escape, layout};

pub fn login_page(error: Option<&str>, username: &str) -> Html<String> {
    layout(
        "Accedi",
        None,
        &format!(
            r#"<div class="card">
<h1>Accedi</h1>
{error}
<form method="post" action="/login">
<label for="username">Nome utente</label>
<input id="username" name="username" value="{username}" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required>
<button type="submit">Accedi</button>
</form>
<p>Non hai un account? <a href="/register">Registrati</a></p>
</div>"#,
            error = error_box(error),
            username = escape(username),
        ),
    )
}

/// Values echoed back into the registration form after a failed attempt.
#[derive(Debug, Default)]
pub struct RegisterValues<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub specialty: &'a str,
}

pub fn register_page(error: Option<&str>, values: &RegisterValues<'_>) -> Html<String> {
    layout(
        "Registrati",
        None,
        &format!(
            r#"<div class="card">
<h1>Registrazione medico</h1>
{error}
<form method="post" action="/register">
<label for="username">Nome utente</label>
<input id="username" name="username" value="{username}" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="new-password" required>
<label for="full_name">Nome e cognome</label>
<input id="full_name" name="full_name" value="{full_name}">
<label for="specialty">Specializzazione</label>
<input id="specialty" name="specialty" value="{specialty}">
<button type="submit">Registrati</button>
</form>
<p>Hai già un account? <a href="/login">Accedi</a></p>
</div>"#,
            error = error_box(error),
            username = escape(values.username),
            full_name = escape(values.full_name),
            specialty = escape(values.specialty),
        ),
    )
}
