use std::{env, path::PathBuf};

use argon2::password_hash::PasswordHash;
use thiserror::Error;

/// Fallback signing secret used only when `APP_ENV` is not `production`.
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

const DEFAULT_DATABASE_URL: &str = "sqlite://blog.db";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_ALLOWED_EXTENSIONS: &str = ".jpg,.jpeg,.png,.gif,.webp";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// ConfigError
///
/// Raised by [`AppConfig::load`] when the environment cannot produce a usable configuration.
/// The server treats any of these as fatal before it binds a socket.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and never
/// mutated afterwards; every service receives the pieces it needs at construction time.
///
/// Not `Debug`: it carries the signing secret and the admin password hash.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret fallbacks.
    pub env: Env,
    // HMAC key used to sign and verify admin bearer tokens.
    pub jwt_secret: String,
    // Argon2 PHC string of the single admin password.
    pub admin_password_hash: String,
    // SQLite location, e.g. `sqlite://blog.db` or `sqlite::memory:`.
    pub database_url: String,
    // Directory managed by the upload store.
    pub upload_dir: PathBuf,
    // Largest accepted upload, in bytes.
    pub max_upload_size: u64,
    // Lowercase extensions with a leading dot.
    pub allowed_extensions: Vec<String>,
    pub bind_addr: String,
}

/// Env
///
/// Runtime context: `Local` gets pretty logs and a fallback signing secret, `Production`
/// gets JSON logs and refuses to start without an explicit secret.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests. The admin hash is empty, so no
    /// password verifies until a test sets one.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            admin_password_hash: String::new(),
            database_url: "sqlite::memory:".to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_extensions: parse_extension_list(DEFAULT_ALLOWED_EXTENSIONS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every parameter from environment variables. `ADMIN_PASSWORD_HASH` is always
    /// required and must be a well-formed PHC string; `JWT_SECRET` is required in production.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match (env, non_empty_var("JWT_SECRET")) {
            (_, Some(secret)) => secret,
            (Env::Production, None) => return Err(ConfigError::Missing("JWT_SECRET")),
            (Env::Local, None) => LOCAL_JWT_SECRET.to_string(),
        };

        let admin_password_hash =
            non_empty_var("ADMIN_PASSWORD_HASH").ok_or(ConfigError::Missing("ADMIN_PASSWORD_HASH"))?;
        PasswordHash::new(&admin_password_hash).map_err(|e| ConfigError::Invalid {
            var: "ADMIN_PASSWORD_HASH",
            reason: e.to_string(),
        })?;

        let max_upload_size = match non_empty_var("MAX_UPLOAD_SIZE") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "MAX_UPLOAD_SIZE",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_SIZE,
        };

        let allowed_extensions = parse_extension_list(
            &non_empty_var("ALLOWED_EXTENSIONS").unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
        );
        if allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                var: "ALLOWED_EXTENSIONS",
                reason: "no extensions listed".to_string(),
            });
        }

        Ok(Self {
            env,
            jwt_secret,
            admin_password_hash,
            database_url: non_empty_var("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            upload_dir: PathBuf::from(
                non_empty_var("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            max_upload_size,
            allowed_extensions,
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Splits a comma-separated list and normalises each entry to `.ext` in lowercase.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .map(|entry| format!(".{entry}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_list_is_normalised() {
        let parsed = parse_extension_list(" .JPG, png ,, .Gif");
        assert_eq!(parsed, vec![".jpg", ".png", ".gif"]);
    }

    #[test]
    fn empty_extension_list_parses_to_nothing() {
        assert!(parse_extension_list(" , ,").is_empty());
    }
}
