use std::path::PathBuf;

use anyhow::{anyhow, Context};
use config::{builder::DefaultState, ConfigBuilder};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "POSTERS_ENV";
const CONFIG_DIR_ENV: &str = "POSTERS_CONFIG_DIR";
const ENV_PREFIX: &str = "POSTERS";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `POSTERS_*` variables and finally the legacy `MONGO_*` and
    /// `SECURITY_JWT_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = legacy_overrides(builder, non_blank_env)?
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment.parse()?;

        Ok(settings)
    }
}

/// Applies the variable names older deployments were configured with.
fn legacy_overrides(
    builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_override_option(
            "database.uri",
            mongo_uri_from(lookup("MONGO_HOST"), lookup("MONGO_PORT")),
        )?
        .set_override_option("database.name", lookup("MONGO_DB"))?
        .set_override_option("auth.secret", lookup("SECURITY_JWT_SECRET"))?
        .set_override_option("auth.expiration", lookup("SECURITY_JWT_EXPIRATION"))
}

/// URI assembled from `MONGO_HOST` / `MONGO_PORT` when either is set.
fn mongo_uri_from(host: Option<String>, port: Option<String>) -> Option<String> {
    if host.is_none() && port.is_none() {
        return None;
    }

    Some(format!(
        "mongodb://{}:{}",
        host.as_deref().unwrap_or(DatabaseSettings::DEFAULT_HOST),
        port.as_deref().unwrap_or(DatabaseSettings::DEFAULT_PORT)
    ))
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
}

impl DatabaseSettings {
    const DEFAULT_HOST: &'static str = "mongodb";
    const DEFAULT_PORT: &'static str = "27017";

    fn default_uri() -> String {
        format!("mongodb://{}:{}", Self::DEFAULT_HOST, Self::DEFAULT_PORT)
    }

    fn default_name() -> String {
        "posters_db".to_string()
    }

    fn default_collection() -> String {
        "posters".to_string()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            name: Self::default_name(),
            collection: Self::default_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// JWT verification settings. Both values are required to serve the API.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthSettings {
    /// HMAC secret shared with the token issuer.
    #[serde(default)]
    pub secret: Option<String>,
    /// Lifetime applied to tokens without `exp`, e.g. `15m` or `24h`.
    #[serde(default)]
    pub expiration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_targets_posters_db() {
        let settings = Settings::default();
        assert_eq!(settings.database.uri, "mongodb://mongodb:27017");
        assert_eq!(settings.database.name, "posters_db");
        assert_eq!(settings.database.collection, "posters");
    }

    #[test]
    fn default_server_binds_all_interfaces() {
        let settings = Settings::default();
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn auth_is_unconfigured_by_default() {
        let settings = Settings::default();
        assert!(settings.auth.secret.is_none());
        assert!(settings.auth.expiration.is_none());
    }

    #[test]
    fn legacy_host_and_port_build_a_uri() {
        assert_eq!(mongo_uri_from(None, None), None);
        assert_eq!(
            mongo_uri_from(Some("mongo.local".to_string()), None).as_deref(),
            Some("mongodb://mongo.local:27017")
        );
        assert_eq!(
            mongo_uri_from(None, Some("27018".to_string())).as_deref(),
            Some("mongodb://mongodb:27018")
        );
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!("qa".parse::<Environment>().is_err());
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn settings_deserialize_from_toml_layers() {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [database]
                uri = "mongodb://db.internal:27017"

                [auth]
                secret = "s3cr3t"
                expiration = "2h"

                [telemetry]
                log_format = "json"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings: Settings = cfg.try_deserialize().unwrap();
        assert_eq!(settings.database.uri, "mongodb://db.internal:27017");
        assert_eq!(settings.database.name, "posters_db");
        assert_eq!(settings.auth.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(settings.auth.expiration.as_deref(), Some("2h"));
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn legacy_variables_override_configured_values() {
        let legacy = std::collections::HashMap::from([
            ("MONGO_HOST", "mongo.legacy"),
            ("MONGO_DB", "archive_db"),
            ("SECURITY_JWT_SECRET", "legacy-secret-at-least-thirty-two-bytes"),
            ("SECURITY_JWT_EXPIRATION", "24h"),
        ]);
        let builder = config::Config::builder().add_source(config::File::from_str(
            r#"
            [database]
            uri = "mongodb://db.internal:27017"

            [auth]
            secret = "from-file"
            "#,
            config::FileFormat::Toml,
        ));

        let settings: Settings = legacy_overrides(builder, |key| {
            legacy.get(key).map(|value| value.to_string())
        })
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();

        assert_eq!(settings.database.uri, "mongodb://mongo.legacy:27017");
        assert_eq!(settings.database.name, "archive_db");
        assert_eq!(
            settings.auth.secret.as_deref(),
            Some("legacy-secret-at-least-thirty-two-bytes")
        );
        assert_eq!(settings.auth.expiration.as_deref(), Some("24h"));
    }

    #[test]
    fn absent_legacy_variables_leave_settings_alone() {
        let builder = config::Config::builder().add_source(config::File::from_str(
            "[auth]\nsecret = \"from-file\"",
            config::FileFormat::Toml,
        ));

        let settings: Settings = legacy_overrides(builder, |_| None)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.auth.secret.as_deref(), Some("from-file"));
        assert_eq!(settings.database.uri, "mongodb://mongodb:27017");
    }
}
