use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use tracing::warn;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `5000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite.
    /// TOML: `basic.database_url`. Default: `sqlite://clinica.db`.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Base64-encoded key (at least 64 bytes once decoded) for the encrypted session cookie.
    /// TOML: `basic.cookie_secret`. Empty => a random key per process, so sessions do not
    /// survive restarts.
    #[serde(default)]
    pub cookie_secret: String,

    /// Drop the `Secure` attribute from session cookies (plain-HTTP development only).
    /// TOML: `basic.insecure_cookie`. Default: `false`.
    #[serde(default)]
    pub insecure_cookie: bool,

    /// Login attempts allowed per username per minute.
    /// TOML: `basic.login_attempts_per_minute`. Default: `10`.
    #[serde(default = "default_login_attempts_per_minute")]
    pub login_attempts_per_minute: u32,

    /// PBKDF2 work factor for newly hashed passwords. Stored hashes keep their own count.
    /// TOML: `basic.password_iterations`. Default: `600000`.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: default_database_url(),
            loglevel: default_loglevel(),
            cookie_secret: String::new(),
            insecure_cookie: false,
            login_attempts_per_minute: default_login_attempts_per_minute(),
            password_iterations: default_password_iterations(),
        }
    }
}

impl BasicConfig {
    /// Resolves the session cookie key, generating a random one when unset or unusable.
    pub fn cookie_key(&self) -> Key {
        let secret = self.cookie_secret.trim();
        if secret.is_empty() {
            return Key::generate();
        }

        let decoded = base64::engine::general_purpose::STANDARD.decode(secret);
        match decoded.as_deref().map(Key::try_from) {
            Ok(Ok(key)) => key,
            Ok(Err(e)) => {
                warn!(error = %e, "basic.cookie_secret too short; using a random key");
                Key::generate()
            }
            Err(e) => {
                warn!(error = %e, "basic.cookie_secret is not valid base64; using a random key");
                Key::generate()
            }
        }
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite://clinica.db".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_login_attempts_per_minute() -> u32 {
    10
}

fn default_password_iterations() -> u32 {
    crate::auth::PBKDF2_ITERATIONS
}
