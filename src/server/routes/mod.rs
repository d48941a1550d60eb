pub mod auth;
pub mod drugs;
pub mod pages;
pub mod patients;

/// Trimmed form value; blank becomes `None`.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
