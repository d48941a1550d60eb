//! Doctor authentication: password hashing and the encrypted session cookie.

mod password;
mod session;

pub use password::{
    PBKDF2_ITERATIONS, dummy_hash, hash_password, verify_password, verify_password_or_dummy,
};
pub use session::{SESSION_COOKIE, clear_session, doctor_id_from_jar, start_session};
