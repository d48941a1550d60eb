use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "clinica_session";
const SESSION_MAX_AGE_HOURS: i64 = 12;

/// Adds the encrypted session cookie holding the doctor id.
pub fn start_session(jar: PrivateCookieJar, doctor_id: i64, insecure: bool) -> PrivateCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, doctor_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(SESSION_MAX_AGE_HOURS))
        .build();
    jar.add(cookie)
}

pub fn clear_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Doctor id from a cookie that decrypted successfully; tampered cookies read as absent.
pub fn doctor_id_from_jar(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().trim().parse::<i64>().ok())
}
