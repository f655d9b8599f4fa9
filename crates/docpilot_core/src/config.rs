//! Process configuration read from environment variables.
//!
//! # Responsibility
//! - Resolve database path, logging settings and Groq settings once at
//!   process start.
//!
//! # Invariants
//! - Services never read the environment; they receive built collaborators.
//! - `GROQ_API_KEY` is only required when a Groq client is requested.

use crate::generation::groq::{GroqClient, GroqConfig};
use crate::generation::GenerationError;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DOCPILOT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DOCPILOT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DOCPILOT_LOG_DIR";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_GROQ_MODEL: &str = "GROQ_MODEL";
pub const ENV_GROQ_BASE_URL: &str = "GROQ_BASE_URL";
pub const ENV_GROQ_TEMPERATURE: &str = "GROQ_TEMPERATURE";
pub const ENV_GROQ_TIMEOUT_SECS: &str = "GROQ_TIMEOUT_SECS";

const DEFAULT_DB_FILE: &str = "docpilot.sqlite3";

/// Configuration failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Variable is set but cannot be parsed.
    InvalidValue { name: &'static str, value: String },
    /// Variable is required for the requested feature but unset.
    Missing(&'static str),
    /// Client construction failed after config was resolved.
    Client(GenerationError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value for {name}: `{value}`")
            }
            Self::Missing(name) => write!(f, "missing required environment variable {name}"),
            Self::Client(err) => write!(f, "failed to build generation client: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// `None` when `GROQ_API_KEY` is unset.
    pub groq: Option<GroqConfig>,
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE));
        let log_level = get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = get(ENV_LOG_DIR).map(PathBuf::from);

        let groq = match get(ENV_GROQ_API_KEY) {
            None => None,
            Some(api_key) => {
                let mut groq = GroqConfig::new(api_key);
                if let Some(model) = get(ENV_GROQ_MODEL) {
                    groq.model = model;
                }
                if let Some(base_url) = get(ENV_GROQ_BASE_URL) {
                    groq.base_url = base_url;
                }
                if let Some(raw) = get(ENV_GROQ_TEMPERATURE) {
                    groq.temperature = parse_temperature(&raw)?;
                }
                if let Some(raw) = get(ENV_GROQ_TIMEOUT_SECS) {
                    groq.timeout_secs = parse_timeout(&raw)?;
                }
                Some(groq)
            }
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            groq,
        })
    }

    /// Builds the Groq client from resolved settings.
    ///
    /// # Errors
    /// - `GROQ_API_KEY` was not set.
    /// - The HTTP client could not be constructed.
    pub fn groq_client(&self) -> Result<GroqClient, ConfigError> {
        let groq = self
            .groq
            .clone()
            .ok_or(ConfigError::Missing(ENV_GROQ_API_KEY))?;
        GroqClient::new(groq).map_err(ConfigError::Client)
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    raw.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..=2.0).contains(value))
        .ok_or_else(|| ConfigError::InvalidValue {
            name: ENV_GROQ_TEMPERATURE,
            value: raw.to_string(),
        })
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: ENV_GROQ_TIMEOUT_SECS,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_GROQ_API_KEY, ENV_GROQ_TEMPERATURE};
    use crate::generation::groq::DEFAULT_MODEL;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.db_path.ends_with("docpilot.sqlite3"));
        assert!(config.log_dir.is_none());
        assert!(config.groq.is_none());
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn groq_settings_are_read_when_key_present() {
        let config = CoreConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", "secret"),
            ("GROQ_TEMPERATURE", "0.2"),
            ("GROQ_TIMEOUT_SECS", "15"),
            ("DOCPILOT_DB_PATH", "/var/lib/docpilot/db.sqlite3"),
        ]))
        .unwrap();

        let groq = config.groq.unwrap();
        assert_eq!(groq.api_key, "secret");
        assert_eq!(groq.model, DEFAULT_MODEL);
        assert_eq!(groq.timeout_secs, 15);
        assert!((groq.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/docpilot/db.sqlite3")
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(config.groq.is_none());
    }

    #[test]
    fn invalid_temperature_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", "secret"),
            ("GROQ_TEMPERATURE", "hot"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name, .. } if name == ENV_GROQ_TEMPERATURE
        ));
    }

    #[test]
    fn groq_client_requires_api_key() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert!(matches!(
            config.groq_client(),
            Err(ConfigError::Missing(name)) if name == ENV_GROQ_API_KEY
        ));
    }
}
