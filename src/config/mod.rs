//! Configuration for the pruner.
//!
//! Two loading paths produce the same typed configuration:
//!
//! 1. Plain environment variables (`ES_URL`, `ES_USERNAME`, `ES_PASSWORD`,
//!    `DRY_RUN`, `INDEX_AGE_LIMIT_DAYS`), the original deployment surface.
//!    All five are required and the boolean/integer values are parsed
//!    strictly; an invalid or missing value aborts before any cluster
//!    contact.
//! 2. A TOML file, with support for environment variable interpolation
//!    using `${VAR_NAME}` syntax:
//!
//! ```toml
//! [cluster]
//! url = "https://search.internal:9200"
//! username = "pruner"
//! password = "${ES_PASSWORD}"
//!
//! [retention]
//! age_limit_days = 30
//! dry_run = false
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

/// Naming-convention prefix applied when none is configured.
pub const DEFAULT_INDEX_PREFIX: &str = "logstash-logs-";

const ENV_URL: &str = "ES_URL";
const ENV_USERNAME: &str = "ES_USERNAME";
const ENV_PASSWORD: &str = "ES_PASSWORD";
const ENV_DRY_RUN: &str = "DRY_RUN";
const ENV_AGE_LIMIT_DAYS: &str = "INDEX_AGE_LIMIT_DAYS";

/// Root configuration for the pruner.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrunerConfig {
    /// Target cluster endpoint and credentials.
    pub cluster: ClusterConfig,

    /// Retention policy settings.
    pub retention: RetentionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Cluster endpoint and credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Base URL of the cluster, e.g. `https://search.internal:9200`.
    pub url: String,

    /// Basic auth username.
    pub username: String,

    /// Basic auth password.
    pub password: String,

    /// Per-request timeout in seconds.
    /// Default: 30
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Retention policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Naming-convention prefix indices must carry to be considered.
    /// Default: `logstash-logs-`
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Retention window in days; the cutoff is `today - age_limit_days`.
    pub age_limit_days: u32,

    /// If true, report the deletion candidates without issuing any
    /// mutating calls.
    pub dry_run: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Output format for diagnostics.
    #[serde(default)]
    pub format: LogFormat,

    /// Default log level; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_index_prefix() -> String {
    DEFAULT_INDEX_PREFIX.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PrunerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            cluster: ClusterConfig {
                url: require_env(ENV_URL)?,
                username: require_env(ENV_USERNAME)?,
                password: require_env(ENV_PASSWORD)?,
                timeout_secs: default_timeout_secs(),
            },
            retention: RetentionConfig {
                index_prefix: default_index_prefix(),
                age_limit_days: parse_env(ENV_AGE_LIMIT_DAYS)?,
                dry_run: parse_env(ENV_DRY_RUN)?,
            },
            logging: LoggingConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing referenced variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: PrunerConfig = toml::from_str(&expanded).map_err(ConfigError::Parse)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and completeness.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.cluster.url).map_err(|e| {
            ConfigError::Validation(format!("invalid cluster URL '{}': {}", self.cluster.url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "cluster URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.cluster.username.is_empty() {
            return Err(ConfigError::Validation(
                "cluster username must not be empty".into(),
            ));
        }

        if self.cluster.password.is_empty() {
            return Err(ConfigError::Validation(
                "cluster password must not be empty".into(),
            ));
        }

        if self.retention.index_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "retention index_prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid {key} value '{value}': {message}")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::EnvVarNotFound(key.to_string()))
}

/// Read and strictly parse an environment variable.
///
/// Booleans accept only `true`/`false`; integers must be non-negative
/// decimal. Anything else is a fatal configuration error, never a default.
fn parse_env<T>(key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require_env(key)?;
    match raw.parse::<T>() {
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            value: raw,
            message: e.to_string(),
        }),
    }
}

/// Expand environment variables in the format `${VAR_NAME}`.
/// Variables appearing after a `#` comment on a line are left untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');
        let mut last_end = 0;

        for cap in re.captures_iter(line) {
            let whole = cap.get(0).expect("capture 0 always present");
            if let Some(pos) = comment_pos {
                if whole.start() >= pos {
                    continue;
                }
            }

            result.push_str(&line[last_end..whole.start()]);

            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            result.push_str(&value);

            last_end = whole.end();
        }

        result.push_str(&line[last_end..]);
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}
