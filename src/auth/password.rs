use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;
const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password as `pbkdf2-sha256$<iterations>$<salt>$<hash>` (base64, no padding).
/// The work factor is stored in the hash, so it can change without breaking old accounts.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill_bytes(&mut salt);
    encode(password, &salt, iterations.max(1))
}

/// Constant-time check of `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((iterations, salt, expected)) = decode(stored) else {
        return false;
    };
    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);
    derived.as_slice().ct_eq(expected.as_slice()).into()
}

/// Like [`verify_password`], but with no account (`stored` is `None`) it runs the same
/// PBKDF2 work against `dummy` and fails.
pub fn verify_password_or_dummy(password: &str, stored: Option<&str>, dummy: &str) -> bool {
    match stored {
        Some(stored) => verify_password(password, stored),
        None => {
            std::hint::black_box(verify_password(password, dummy));
            false
        }
    }
}

/// A hash of a random password at `iterations`, for [`verify_password_or_dummy`].
pub fn dummy_hash(iterations: u32) -> String {
    let mut password = [0u8; SALT_LENGTH];
    rand::rng().fill_bytes(&mut password);
    hash_password(&STANDARD_NO_PAD.encode(password), iterations)
}

fn encode(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

fn decode(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok().filter(|n| *n > 0)?;
    let salt = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    let hash = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    if parts.next().is_some() || salt.is_empty() || hash.is_empty() {
        return None;
    }
    Some((iterations, salt, hash))
}
