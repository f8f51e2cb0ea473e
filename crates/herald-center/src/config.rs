//! Configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Notification center behaviour.
    #[serde(default)]
    pub center: CenterConfig,

    /// Randomised soak workload settings.
    #[serde(default)]
    pub soak: SoakConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do with add/remove calls that carry no event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingNamePolicy {
    /// Treat the call as a no-op.
    #[default]
    Ignore,
    /// Fail the call with `CenterError::MissingEventName`.
    Reject,
}

impl std::str::FromStr for MissingNamePolicy {
    type Err = ParseMissingNamePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseMissingNamePolicyError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown missing-name policy.
#[derive(Debug, Clone, Error)]
#[error("unknown missing-name policy: {0}")]
pub struct ParseMissingNamePolicyError(pub String);

/// Notification center configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CenterConfig {
    /// Policy for calls without an event name.
    #[serde(default)]
    pub missing_name: MissingNamePolicy,
}

/// Shape of the randomised soak workload.
#[derive(Debug, Clone, Deserialize)]
pub struct SoakConfig {
    /// Number of workload rounds.
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Size of the observer pool.
    #[serde(default = "default_pool")]
    pub observers: usize,

    /// Size of the event name pool.
    #[serde(default = "default_pool")]
    pub events: usize,

    /// Size of the payload key pool.
    #[serde(default = "default_pool")]
    pub payloads: usize,

    /// Number of distinct callback identifiers.
    #[serde(default = "default_callbacks")]
    pub callbacks: u8,

    /// Share of payload key slots left unscoped, between 0 and 1.
    #[serde(default = "default_unscoped_ratio")]
    pub unscoped_ratio: f64,

    /// RNG seed. A random seed is drawn and reported when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "herald_center=trace,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_runs() -> u32 {
    1000
}

fn default_pool() -> usize {
    10
}

fn default_callbacks() -> u8 {
    3
}

fn default_unscoped_ratio() -> f64 {
    1.0 / 6.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            observers: default_pool(),
            events: default_pool(),
            payloads: default_pool(),
            callbacks: default_callbacks(),
            unscoped_ratio: default_unscoped_ratio(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `HERALD_MISSING_NAME` overrides `center.missing_name` (`ignore`/`reject`)
/// - `HERALD_SOAK_RUNS` overrides `soak.runs`
/// - `HERALD_SOAK_SEED` overrides `soak.seed`
/// - `HERALD_LOG_LEVEL` overrides `logging.level`
/// - `HERALD_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Ok(policy) = std::env::var("HERALD_MISSING_NAME") {
        match policy.parse() {
            Ok(parsed) => config.center.missing_name = parsed,
            Err(e) => tracing::warn!("ignoring HERALD_MISSING_NAME: {}", e),
        }
    }
    if let Ok(runs) = std::env::var("HERALD_SOAK_RUNS") {
        if let Ok(parsed) = runs.parse() {
            config.soak.runs = parsed;
        }
    }
    if let Ok(seed) = std::env::var("HERALD_SOAK_SEED") {
        if let Ok(parsed) = seed.parse() {
            config.soak.seed = Some(parsed);
        }
    }
    if let Ok(level) = std::env::var("HERALD_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("HERALD_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}
