mod common;

use scopo_blog::{
    AppConfig,
    config::{ConfigError, Env},
};
use serial_test::serial;
use std::{env, panic, path::PathBuf};

const CONFIG_VARS: [&str; 8] = [
    "APP_ENV",
    "JWT_SECRET",
    "ADMIN_PASSWORD_HASH",
    "DATABASE_URL",
    "UPLOAD_DIR",
    "MAX_UPLOAD_SIZE",
    "ALLOWED_EXTENSIONS",
    "BIND_ADDR",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with exactly `vars` set (every other config variable cleared), then restores
/// whatever the process environment held before.
fn run_with_env<T, R>(vars: &[(&'static str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_local_env_defaults() {
    let hash = common::test_password_hash();

    let config = run_with_env(&[("ADMIN_PASSWORD_HASH", hash)], AppConfig::load).unwrap();

    assert_eq!(config.env, Env::Local);
    assert!(!config.jwt_secret.is_empty());
    assert_eq!(config.admin_password_hash, hash);
    assert_eq!(config.database_url, "sqlite://blog.db");
    assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
    assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
    assert_eq!(
        config.allowed_extensions,
        vec![".jpg", ".jpeg", ".png", ".gif", ".webp"]
    );
    assert_eq!(config.bind_addr, "0.0.0.0:8080");
}

#[test]
#[serial]
fn test_every_setting_can_be_overridden() {
    let hash = common::test_password_hash();

    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "prod-secret"),
            ("ADMIN_PASSWORD_HASH", hash),
            ("DATABASE_URL", "sqlite:///var/lib/blog/blog.db"),
            ("UPLOAD_DIR", "/srv/media"),
            ("MAX_UPLOAD_SIZE", "2048"),
            ("ALLOWED_EXTENSIONS", "PDF, .txt ,,"),
            ("BIND_ADDR", "127.0.0.1:3000"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.database_url, "sqlite:///var/lib/blog/blog.db");
    assert_eq!(config.upload_dir, PathBuf::from("/srv/media"));
    assert_eq!(config.max_upload_size, 2048);
    assert_eq!(config.allowed_extensions, vec![".pdf", ".txt"]);
    assert_eq!(config.bind_addr, "127.0.0.1:3000");
}

#[test]
#[serial]
fn test_production_fails_fast_without_jwt_secret() {
    let hash = common::test_password_hash();

    let result = run_with_env(
        &[("APP_ENV", "production"), ("ADMIN_PASSWORD_HASH", hash)],
        AppConfig::load,
    );

    assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
}

#[test]
#[serial]
fn test_missing_admin_hash_is_fatal() {
    let result = run_with_env(&[("JWT_SECRET", "secret")], AppConfig::load);

    assert!(matches!(result, Err(ConfigError::Missing("ADMIN_PASSWORD_HASH"))));
}

#[test]
#[serial]
fn test_plaintext_admin_password_is_rejected() {
    let result = run_with_env(&[("ADMIN_PASSWORD_HASH", "hunter2")], AppConfig::load);

    assert!(matches!(
        result,
        Err(ConfigError::Invalid { var: "ADMIN_PASSWORD_HASH", .. })
    ));
}

#[test]
#[serial]
fn test_non_numeric_upload_size_is_rejected() {
    let hash = common::test_password_hash();

    let result = run_with_env(
        &[("ADMIN_PASSWORD_HASH", hash), ("MAX_UPLOAD_SIZE", "ten megabytes")],
        AppConfig::load,
    );

    assert!(matches!(
        result,
        Err(ConfigError::Invalid { var: "MAX_UPLOAD_SIZE", .. })
    ));
}

#[test]
#[serial]
fn test_blank_extension_list_is_rejected() {
    let hash = common::test_password_hash();

    let result = run_with_env(
        &[("ADMIN_PASSWORD_HASH", hash), ("ALLOWED_EXTENSIONS", " , ,")],
        AppConfig::load,
    );

    assert!(matches!(
        result,
        Err(ConfigError::Invalid { var: "ALLOWED_EXTENSIONS", .. })
    ));
}

#[test]
fn test_default_config_accepts_no_password() {
    let config = AppConfig::default();

    assert!(config.admin_password_hash.is_empty());
    assert!(!scopo_blog::password::verify_secret("", &config.admin_password_hash));
    assert_eq!(config.env, Env::Local);
}
