use crate::hub::DEFAULT_SUBSCRIBER_CAPACITY;
use serde::Deserialize;
use std::time::Duration;

/// Complete tracker configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Broadcast hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Queued events per subscriber before new events are dropped for it
    #[serde(default = "default_subscriber_capacity")]
    pub subscriber_capacity: usize,
}

fn default_subscriber_capacity() -> usize {
    DEFAULT_SUBSCRIBER_CAPACITY
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: default_subscriber_capacity(),
        }
    }
}

/// Position store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Evict positions not refreshed within this many seconds. Unset keeps
    /// positions for the life of the process.
    #[serde(default)]
    pub ttl_seconds: Option<u64>,

    /// How often the eviction sweeper runs (seconds)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_sweep_interval() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: None,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl StoreConfig {
    /// `(ttl, sweep_interval)` when eviction is enabled
    pub fn eviction(&self) -> Option<(Duration, Duration)> {
        let ttl = self.ttl_seconds.filter(|&s| s > 0)?;
        Some((
            Duration::from_secs(ttl),
            Duration::from_secs(self.sweep_interval_seconds.max(1)),
        ))
    }
}

/// Request body limits for the ingest endpoints
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_single_body_bytes")]
    pub single_body_bytes: usize,
    #[serde(default = "default_batch_body_bytes")]
    pub batch_body_bytes: usize,
}

fn default_single_body_bytes() -> usize {
    65_536 // 64 KB
}

fn default_batch_body_bytes() -> usize {
    1_048_576 // 1 MB
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            single_body_bytes: default_single_body_bytes(),
            batch_body_bytes: default_batch_body_bytes(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<TrackerConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: TrackerConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.hub.subscriber_capacity, 1000);
        assert_eq!(config.store.ttl_seconds, None);
        assert_eq!(config.store.sweep_interval_seconds, 30);
        assert!(config.store.eviction().is_none());
        assert_eq!(config.limits.single_body_bytes, 65_536);
        assert_eq!(config.limits.batch_body_bytes, 1_048_576);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            bind_addr = "127.0.0.1:8080"

            [hub]
            subscriber_capacity = 64

            [store]
            ttl_seconds = 300
            sweep_interval_seconds = 10

            [limits]
            single_body_bytes = 512
            batch_body_bytes = 4096
        "#;

        let config: TrackerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.hub.subscriber_capacity, 64);
        assert_eq!(
            config.store.eviction(),
            Some((Duration::from_secs(300), Duration::from_secs(10)))
        );
        assert_eq!(
            config.limits,
            LimitsConfig {
                single_body_bytes: 512,
                batch_body_bytes: 4096
            }
        );
    }

    #[test]
    fn test_partial_config() {
        // Missing sections use defaults
        let toml = r#"
            [store]
            ttl_seconds = 60
        "#;

        let config: TrackerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.store.ttl_seconds, Some(60));
        assert_eq!(config.store.sweep_interval_seconds, 30);
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_zero_ttl_disables_eviction() {
        let config: TrackerConfig = toml::from_str("[store]\nttl_seconds = 0\n").unwrap();
        assert!(config.store.eviction().is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hub]\nsubscriber_capacity = 5").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.hub.subscriber_capacity, 5);
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/tracker.toml").is_err());
    }
}
