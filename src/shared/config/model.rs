use serde::Deserialize;
use std::env;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Fill value for integer and double columns of empty buckets when a
    /// query gives none. Other column types fill with null.
    #[serde(default = "default_fill")]
    pub default_fill: String,
    /// Abort queries running longer than this many milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_fill: default_fill(),
            timeout_ms: None,
        }
    }
}

fn default_fill() -> String {
    "0".to_string()
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("SAMPLE_BY_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Load settings from `path` (extension optional). A missing file yields defaults.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
