use std::env;
use std::path::PathBuf;

use eeg_frame::{FrameError, FrameLayout, DEFAULT_CHANNELS, DEFAULT_SAMPLES_PER_CHANNEL};

/// Relay configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Host the producer ingest socket binds to
    pub ingest_host: String,
    /// Port the producer connects to
    pub ingest_port: u16,
    /// Host the HTTP server binds to
    pub web_host: String,
    /// HTTP port
    pub web_port: u16,
    /// Expected frame shape, reported by `/health`
    pub layout: FrameLayout,
    /// Directory containing the page served at `/`
    pub static_dir: PathBuf,
    /// File name of the page served at `/`
    pub index_file: String,
    /// Largest sample magnitude a producer may send; bounds the line length
    pub max_sample_abs: f64,
}

/// Default for `max_sample_abs`, well above the synthetic signal's range
pub const DEFAULT_MAX_SAMPLE_ABS: f64 = 1000.0;

impl RelayConfig {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channels = parse_or(&lookup, "EEG_CHANNELS", DEFAULT_CHANNELS)?;
        let samples_per_channel =
            parse_or(&lookup, "EEG_SAMPLES_PER_CHANNEL", DEFAULT_SAMPLES_PER_CHANNEL)?;
        let max_sample_abs = parse_or(&lookup, "EEG_MAX_SAMPLE_ABS", DEFAULT_MAX_SAMPLE_ABS)?;
        if !max_sample_abs.is_finite() || max_sample_abs < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "EEG_MAX_SAMPLE_ABS".to_string(),
                value: max_sample_abs.to_string(),
            });
        }

        Ok(Self {
            ingest_host: lookup("EEG_INGEST_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            ingest_port: parse_port(&lookup, "EEG_INGEST_PORT", 9090)?,
            web_host: lookup("EEG_WEB_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            web_port: parse_port(&lookup, "EEG_WEB_PORT", 8000)?,
            layout: FrameLayout::new(channels, samples_per_channel)?,
            static_dir: lookup("EEG_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            index_file: lookup("EEG_INDEX_FILE").unwrap_or_else(|| "webgl_graph.html".to_string()),
            max_sample_abs,
        })
    }

    /// Ingest bind address (host:port)
    pub fn ingest_address(&self) -> String {
        format!("{}:{}", self.ingest_host, self.ingest_port)
    }

    /// HTTP bind address (host:port)
    pub fn web_address(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }

    /// Longest ingest line accepted, newline included
    pub fn max_line_len(&self) -> usize {
        self.layout.max_line_len(self.max_sample_abs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ingest_host: "127.0.0.1".to_string(),
            ingest_port: 9090,
            web_host: "127.0.0.1".to_string(),
            web_port: 8000,
            layout: FrameLayout::default(),
            static_dir: PathBuf::from("."),
            index_file: "webgl_graph.html".to_string(),
            max_sample_abs: DEFAULT_MAX_SAMPLE_ABS,
        }
    }
}

fn parse_port<F>(lookup: &F, key: &str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort {
                key: key.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number for {key}: {value:?}")]
    InvalidPort { key: String, value: String },
    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error(transparent)]
    InvalidLayout(#[from] FrameError),
}
