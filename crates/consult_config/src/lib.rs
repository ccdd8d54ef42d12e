//! Configuration loading for the consultation backend.
//!
//! Sources are layered in this order, later ones winning:
//!
//! 1. `config/default.(toml|yaml|json)`
//! 2. `config/{RUN_ENV}.(toml|yaml|json)` (`RUN_ENV` defaults to `debug`)
//! 3. `CONSULT__SECTION__KEY` environment variables
//! 4. `"secret_from_env"` markers, resolved from the environment
//! 5. the legacy variables `PORT`, `JWT_SECRET` and `DATABASE_URL`

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod models;
pub use models::*;

/// Value used in config files for entries that must come from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Longest accepted token lifetime (a hundred years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 100;

/// Prefix for structured environment overrides (`CONSULT__SERVER__PORT`).
pub const ENV_PREFIX: &str = "CONSULT";

/// Loads the configuration from `CONFIG_DIR` (default `./config`) and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    let config = load_config_from(&config_dir)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the layered configuration rooted at `config_dir` without validating it.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config, |key| env::var(key).ok())?;
    Ok(apply_legacy_env_overrides(config, |key| env::var(key).ok()))
}

/// Rejects configurations the server cannot run with.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.jwt_secret.trim().is_empty() || config.auth.jwt_secret == SECRET_MARKER {
        return Err(ConfigError::Message(
            "auth.jwt_secret is not set (use AUTH_JWT_SECRET or JWT_SECRET)".to_string(),
        ));
    }
    if config.auth.token_ttl_hours <= 0 {
        return Err(ConfigError::Message(
            "auth.token_ttl_hours must be positive".to_string(),
        ));
    }
    if config.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
        return Err(ConfigError::Message(format!(
            "auth.token_ttl_hours must not exceed {MAX_TOKEN_TTL_HOURS}"
        )));
    }
    Ok(())
}

/// Recursively replaces all `"secret_from_env"` string values with environment values.
///
/// The variable name is the upper-cased config path joined with `_`, so
/// `auth.jwt_secret` reads `AUTH_JWT_SECRET`.
fn inject_env_secrets<F>(value: &mut Value, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    fn walk<F>(path: &mut Vec<String>, obj: &mut Value, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, lookup);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                match lookup(&env_key) {
                    Some(env_val) => *obj = Value::String(env_val),
                    None => warn!("env var {} not found for {}", env_key, SECRET_MARKER),
                }
            }
            _ => {}
        }
    }

    walk(&mut Vec::new(), value, lookup);
}

/// Applies environment overrides based on `"secret_from_env"` markers in the config.
pub fn apply_env_overrides_from_marker<F>(
    config: AppConfig,
    lookup: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut json = serde_json::to_value(&config)
        .map_err(|e| ConfigError::Message(format!("config is not serializable: {e}")))?;
    inject_env_secrets(&mut json, &lookup);
    serde_json::from_value(json)
        .map_err(|e| ConfigError::Message(format!("config is not deserializable: {e}")))
}

/// Honours the plain variables older deployments were started with.
pub fn apply_legacy_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("ignoring invalid PORT value: {}", port),
        }
    }
    if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
        if config.auth.jwt_secret.is_empty() || config.auth.jwt_secret == SECRET_MARKER {
            config.auth.jwt_secret = secret;
        }
    }
    if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
        match config.database.as_mut() {
            Some(db) => db.url = url,
            None => {
                config.database = Some(DatabaseConfig {
                    url,
                    max_connections: None,
                })
            }
        }
    }
    config
}

static INIT_DOTENV: OnceCell<String> = OnceCell::new();

/// Loads the dotenv file once per process and returns the path that was used.
///
/// `DOTENV_OVERRIDE` wins over a first CLI argument starting with `.env`,
/// which wins over `.env`. A missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    INIT_DOTENV
        .get_or_init(|| {
            let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
            let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

            let dotenv_path = dotenv_path_override
                .or(dotenv_path_arg)
                .unwrap_or_else(|| ".env".to_string());
            dotenv::from_filename(&dotenv_path).ok();
            dotenv_path
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn marker_is_replaced_from_environment() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = SECRET_MARKER.to_string();

        let config =
            apply_env_overrides_from_marker(config, lookup_from(&[("AUTH_JWT_SECRET", "s3cret")]))
                .unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
    }

    #[test]
    fn missing_secret_keeps_marker_and_fails_validation() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = SECRET_MARKER.to_string();

        let config = apply_env_overrides_from_marker(config, lookup_from(&[])).unwrap();

        assert_eq!(config.auth.jwt_secret, SECRET_MARKER);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn legacy_variables_override_config() {
        let config = apply_legacy_env_overrides(
            AppConfig::default(),
            lookup_from(&[
                ("PORT", "4000"),
                ("JWT_SECRET", "legacy"),
                ("DATABASE_URL", "sqlite://data/test.db"),
            ]),
        );

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.jwt_secret, "legacy");
        assert!(validate(&config).is_ok());
        assert_eq!(config.database.unwrap().url, "sqlite://data/test.db");
    }

    #[test]
    fn legacy_secret_does_not_override_explicit_secret() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "explicit".to_string();

        let config = apply_legacy_env_overrides(config, lookup_from(&[("JWT_SECRET", "legacy")]));

        assert_eq!(config.auth.jwt_secret, "explicit");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let config =
            apply_legacy_env_overrides(AppConfig::default(), lookup_from(&[("PORT", "http")]));
        assert_eq!(config.server.port, ServerConfig::default().port);
    }

    #[test]
    fn loads_defaults_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
            [server]
            host = "127.0.0.1"
            port = 8081

            [database]
            url = "sqlite://data/consultation.db"

            [auth]
            jwt_secret = "from-file"
            token_ttl_hours = 12
            "#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.token_ttl_hours, 12);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "x".to_string();
        config.auth.token_ttl_hours = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_oversized_ttl() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "x".to_string();
        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(validate(&config).is_ok());

        config.auth.token_ttl_hours = 10_000_000_000;
        assert!(validate(&config).is_err());
    }
}
