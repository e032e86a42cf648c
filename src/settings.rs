//! Layered service configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `carpenter.toml` in the working directory, or the file named by
//!    `CARPENTER_CONFIG`
//! 3. `CARPENTER__<SECTION>__<KEY>` environment variables
//! 4. The deployment conventions `DATABASE_URL` and `PORT`
//!
//! A `.env` file is loaded into the process environment first when present.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const ENV_PREFIX: &str = "CARPENTER";
const ENV_SEPARATOR: &str = "__";
const CONFIG_PATH_VAR: &str = "CARPENTER_CONFIG";
const DEFAULT_CONFIG_NAME: &str = "carpenter";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or the merged values do not deserialize.
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    /// The `.env` file exists but could not be parsed.
    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
    /// `PORT` is not a valid TCP port.
    #[error("PORT must be a TCP port number, got '{0}'")]
    InvalidPort(String),
    /// The configured host and port do not form a socket address.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Allowed browser origin. Any origin is allowed when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl ServerSettings {
    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] when `host` is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| SettingsError::InvalidBindAddress(raw.clone()))
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSettings {
    /// `PostgreSQL` connection URL. The server refuses to start without one.
    #[serde(default)]
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Applies the bundled schema on start-up.
    pub auto_migrate: bool,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emits JSON lines instead of human-readable output.
    pub json: bool,
}

/// Task lifecycle tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleSettings {
    /// Attempts per lifecycle action before a concurrent modification is
    /// reported.
    pub conflict_attempts: u32,
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// HTTP server.
    pub server: ServerSettings,
    /// Persistence.
    pub database: DatabaseSettings,
    /// Logging.
    pub logging: LoggingSettings,
    /// Task lifecycle.
    pub lifecycle: LifecycleSettings,
}

impl Settings {
    /// Loads `.env`, then resolves settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source is malformed.
    pub fn load() -> Result<Self, SettingsError> {
        match dotenvy::dotenv() {
            Err(err) if !err.not_found() => return Err(err.into()),
            _ => {}
        }
        Self::from_env(std::env::vars())
    }

    /// Resolves settings from an explicit set of environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source is malformed.
    pub fn from_env(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, SettingsError> {
        let env: HashMap<String, String> = vars.into_iter().collect();

        let file_source = env.get(CONFIG_PATH_VAR).map_or_else(
            || File::with_name(DEFAULT_CONFIG_NAME).required(false),
            |path| File::from(PathBuf::from(path)).required(true),
        );

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000_i64)?
            .set_default("database.max_connections", 10_i64)?
            .set_default("database.auto_migrate", true)?
            .set_default("logging.filter", "info")?
            .set_default("logging.json", false)?
            .set_default("lifecycle.conflict_attempts", 3_i64)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(Some(env.clone().into_iter().collect())),
            );

        if let Some(url) = env.get("DATABASE_URL") {
            builder = builder.set_override("database.url", url.as_str())?;
        }
        if let Some(raw_port) = env.get("PORT") {
            let port: u16 = raw_port
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidPort(raw_port.clone()))?;
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
