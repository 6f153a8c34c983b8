//! Store configuration.
//!
//! Settings come from a JSON document or from `PIGEONHOLE_*` environment
//! variables. Environment lookups go through `dotenvy`, so a `.env` file in
//! the working directory is honoured.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "PIGEONHOLE_DATABASE_URL";
/// Environment variable holding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "PIGEONHOLE_MAX_CONNECTIONS";
/// Environment variable holding the pool checkout timeout in seconds.
pub const CONNECTION_TIMEOUT_VAR: &str = "PIGEONHOLE_CONNECTION_TIMEOUT_SECS";
/// Environment variable holding the per-recipient queue capacity.
pub const OFFLINE_QUEUE_SIZE_VAR: &str = "PIGEONHOLE_OFFLINE_QUEUE_SIZE";

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OFFLINE_QUEUE_SIZE: usize = 200;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors returned while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON for [`StoreSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The database URL was not provided.
    #[error("database URL is required (set {})", DATABASE_URL_VAR)]
    MissingDatabaseUrl,

    /// A setting holds an unusable value.
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Offending raw value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Settings for the PostgreSQL-backed offline store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: u64,
    /// Maximum queued messages per recipient.
    pub offline_queue_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            offline_queue_size: DEFAULT_OFFLINE_QUEUE_SIZE,
        }
    }
}

impl StoreSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or a validation
    /// error from [`StoreSettings::validate`].
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses, and validates settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`StoreSettings::from_json_str`].
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Loads settings from the process environment and any `.env` file.
    ///
    /// # Errors
    ///
    /// As [`StoreSettings::from_lookup`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// Unset optional keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when the URL is unset,
    /// [`ConfigError::Invalid`] when a numeric value does not parse, or a
    /// validation error from [`StoreSettings::validate`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let database_url = lookup(DATABASE_URL_VAR).ok_or(ConfigError::MissingDatabaseUrl)?;
        let settings = Self {
            database_url,
            max_connections: parse_var(&lookup, MAX_CONNECTIONS_VAR)?
                .unwrap_or(defaults.max_connections),
            connection_timeout_secs: parse_var(&lookup, CONNECTION_TIMEOUT_VAR)?
                .unwrap_or(defaults.connection_timeout_secs),
            offline_queue_size: parse_var(&lookup, OFFLINE_QUEUE_SIZE_VAR)?
                .unwrap_or(defaults.offline_queue_size),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] for a blank URL, or
    /// [`ConfigError::Invalid`] for a zero pool size, timeout, or queue size.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        ensure_positive(MAX_CONNECTIONS_VAR, u64::from(self.max_connections))?;
        ensure_positive(CONNECTION_TIMEOUT_VAR, self.connection_timeout_secs)?;
        ensure_positive(
            OFFLINE_QUEUE_SIZE_VAR,
            u64::try_from(self.offline_queue_size).unwrap_or(u64::MAX),
        )?;
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn ensure_positive(key: &'static str, value: u64) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(())
}
