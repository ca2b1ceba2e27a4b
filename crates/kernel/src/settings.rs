use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const ENV_VAR_NAME: &str = "NODE_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Postgres port used by every deployment.
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// Environment variables that feed `database.*`, paired with their config keys.
const DATABASE_ENV_KEYS: &[(&str, &str)] = &[
    ("DATABASE_HOST", "database.host"),
    ("DATABASE_NAME", "database.name"),
    ("DATABASE_USER", "database.user"),
    ("DATABASE_PASSWORD", "database.password"),
];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Parse the value of `NODE_ENV`.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "development" | "local" | "" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected development/test/staging/production",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and process environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = match std::env::var(ENV_VAR_NAME) {
            Ok(value) => Environment::parse(&value)?,
            Err(_) => Environment::default(),
        };
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_with(environment, &config_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with the environment, config directory and
    /// variable lookup supplied by the caller.
    pub fn load_with<F>(environment: Environment, config_dir: &Path, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        for &(var, key) in DATABASE_ENV_KEYS {
            builder = builder
                .set_override_option(key, lookup(var))
                .with_context(|| format!("invalid value for {}", var))?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment;
        Ok(settings.resolve())
    }

    /// Apply environment-specific overrides on top of the loaded values.
    pub fn resolve(mut self) -> Self {
        if self.environment == Environment::Test {
            self.database = DatabaseSettings::test_fixture();
        }
        self
    }
}

/// Connection parameters for the Postgres store.
///
/// Unset fields fall through to the driver defaults (`PGHOST`, `PGUSER`, ...).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Store port. Always [`DEFAULT_DATABASE_PORT`]; config sources cannot change it.
    pub fn port(&self) -> u16 {
        DEFAULT_DATABASE_PORT
    }

    fn default_max_connections() -> u32 {
        10
    }

    /// Fixed local credentials used when running under `NODE_ENV=test`.
    pub fn test_fixture() -> Self {
        Self {
            host: Some("localhost".to_string()),
            name: Some("postgres".to_string()),
            user: Some("postgres".to_string()),
            password: Some("postgres".to_string()),
            max_connections: Self::default_max_connections(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: None,
            name: None,
            user: None,
            password: None,
            max_connections: Self::default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_dir() -> PathBuf {
        PathBuf::from("/nonexistent/bookshelf-config")
    }

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn default_environment_is_development() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Development);
    }

    #[test]
    fn default_database_port_is_5432() {
        let settings = Settings::default();
        assert_eq!(settings.database.port(), 5432);
        assert_eq!(settings.database.host, None);
    }

    #[test]
    fn parses_known_environments() {
        assert_eq!(Environment::parse("test").unwrap(), Environment::Test);
        assert_eq!(Environment::parse("local").unwrap(), Environment::Development);
        assert_eq!(
            Environment::parse("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = Environment::parse("qa").unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn database_variables_feed_database_settings() {
        let lookup = lookup_from(&[
            ("DATABASE_HOST", "db.internal"),
            ("DATABASE_NAME", "library"),
            ("DATABASE_USER", "reader"),
            ("DATABASE_PASSWORD", "secret"),
        ]);

        let settings =
            Settings::load_with(Environment::Production, &missing_dir(), lookup).unwrap();

        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.database.host.as_deref(), Some("db.internal"));
        assert_eq!(settings.database.name.as_deref(), Some("library"));
        assert_eq!(settings.database.user.as_deref(), Some("reader"));
        assert_eq!(settings.database.password.as_deref(), Some("secret"));
        assert_eq!(settings.database.port(), 5432);
    }

    #[test]
    fn test_environment_uses_fixed_credentials() {
        let lookup = lookup_from(&[("DATABASE_HOST", "db.internal")]);

        let settings = Settings::load_with(Environment::Test, &missing_dir(), lookup).unwrap();

        assert_eq!(settings.database, DatabaseSettings::test_fixture());
        assert_eq!(settings.database.host.as_deref(), Some("localhost"));
    }

    #[test]
    fn configured_port_is_ignored() {
        let config_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/port_override");

        let settings =
            Settings::load_with(Environment::Production, &config_dir, |_| None).unwrap();

        // The fixture was read: its pool size took effect.
        assert_eq!(settings.database.max_connections, 3);
        assert_eq!(settings.database.port(), DEFAULT_DATABASE_PORT);
    }
}
