use std::env;
use std::time::Duration;

use eeg_frame::{FrameError, FrameLayout, DEFAULT_CHANNELS, DEFAULT_SAMPLES_PER_CHANNEL};

/// Producer configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerConfig {
    /// Relay ingest host
    pub relay_host: String,
    /// Relay ingest port
    pub relay_port: u16,
    pub layout: FrameLayout,
    /// Wait between failed connection attempts
    pub reconnect_interval: Duration,
    /// Pause after each frame
    pub loop_interval: Duration,
    /// Increment of the global time counter per frame
    pub time_step: f64,
    /// Full width of the uniform noise band centred on zero
    pub noise_amplitude: f64,
}

impl ProducerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let relay_port = match lookup("EEG_RELAY_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort {
                    key: "EEG_RELAY_PORT".to_string(),
                    value,
                })?,
            None => defaults.relay_port,
        };

        let channels = parse_or(&lookup, "EEG_CHANNELS", DEFAULT_CHANNELS)?;
        let samples_per_channel =
            parse_or(&lookup, "EEG_SAMPLES_PER_CHANNEL", DEFAULT_SAMPLES_PER_CHANNEL)?;
        let reconnect_ms = parse_or(&lookup, "EEG_RECONNECT_INTERVAL_MS", 2000u64)?;
        let loop_ms = parse_or(&lookup, "EEG_LOOP_INTERVAL_MS", 50u64)?;
        let time_step = parse_or(&lookup, "EEG_TIME_STEP", defaults.time_step)?;
        let noise_amplitude = parse_or(&lookup, "EEG_NOISE_AMPLITUDE", defaults.noise_amplitude)?;

        if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "EEG_NOISE_AMPLITUDE".to_string(),
                value: noise_amplitude.to_string(),
            });
        }
        if !time_step.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "EEG_TIME_STEP".to_string(),
                value: time_step.to_string(),
            });
        }

        Ok(Self {
            relay_host: lookup("EEG_RELAY_HOST").unwrap_or(defaults.relay_host),
            relay_port,
            layout: FrameLayout::new(channels, samples_per_channel)?,
            reconnect_interval: Duration::from_millis(reconnect_ms),
            loop_interval: Duration::from_millis(loop_ms),
            time_step,
            noise_amplitude,
        })
    }

    /// Relay address (host:port)
    pub fn relay_address(&self) -> String {
        format!("{}:{}", self.relay_host, self.relay_port)
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            relay_host: "127.0.0.1".to_string(),
            relay_port: 9090,
            layout: FrameLayout::default(),
            reconnect_interval: Duration::from_secs(2),
            loop_interval: Duration::from_millis(50),
            time_step: 0.1,
            noise_amplitude: 0.2,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = ProducerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ProducerConfig::default());
        assert_eq!(config.relay_address(), "127.0.0.1:9090");
        assert_eq!(config.layout.total(), 8000);
        assert_eq!(config.reconnect_interval, Duration::from_secs(2));
        assert_eq!(config.loop_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_overrides() {
        let config = ProducerConfig::from_lookup(|key| match key {
            "EEG_RELAY_HOST" => Some("relay.local".to_string()),
            "EEG_RELAY_PORT" => Some("9191".to_string()),
            "EEG_CHANNELS" => Some("2".to_string()),
            "EEG_SAMPLES_PER_CHANNEL" => Some("16".to_string()),
            "EEG_LOOP_INTERVAL_MS" => Some("5".to_string()),
            "EEG_NOISE_AMPLITUDE" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.relay_address(), "relay.local:9191");
        assert_eq!(config.layout.total(), 32);
        assert_eq!(config.loop_interval, Duration::from_millis(5));
        assert_eq!(config.noise_amplitude, 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_port = ProducerConfig::from_lookup(|key| {
            (key == "EEG_RELAY_PORT").then(|| "99999".to_string())
        });
        assert!(matches!(bad_port, Err(ConfigError::InvalidPort { .. })));

        let bad_noise = ProducerConfig::from_lookup(|key| {
            (key == "EEG_NOISE_AMPLITUDE").then(|| "-1".to_string())
        });
        assert!(matches!(bad_noise, Err(ConfigError::InvalidValue { .. })));

        let no_samples = ProducerConfig::from_lookup(|key| {
            (key == "EEG_SAMPLES_PER_CHANNEL").then(|| "0".to_string())
        });
        assert!(matches!(no_samples, Err(ConfigError::InvalidLayout(_))));
    }
}
