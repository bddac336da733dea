//! Configuration for the TSAT ground station
//!
//! Loads configuration from a TOML file. Every key has a default, so a file only
//! needs to name what differs from them.

use crate::error::{Error, Result};
use crate::link::LinkSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Longest allowed transport poll interval; bounds shutdown latency
const MAX_READ_TIMEOUT_MS: u64 = 1000;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial link to the ground receiver
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Receiver serial port
    ///
    /// Usually `COM1` on Windows and `/dev/ttyUSB0` or `/dev/ttyS0` on Linux/Mac
    pub port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Transport poll interval in milliseconds
    pub read_timeout_ms: u64,
    /// Satellite id written into outbound Ping frames
    pub satellite_id: u8,
    /// Outbound Ping period in milliseconds (0 = never ping)
    pub ping_interval_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 50,
            satellite_id: 0,
            ping_interval_ms: 0,
        }
    }
}

impl LinkConfig {
    /// Transport poll interval
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Runtime settings for [`GroundLink`](crate::link::GroundLink)
    pub fn settings(&self) -> LinkSettings {
        LinkSettings {
            satellite_id: self.satellite_id,
            ping_interval: (self.ping_interval_ms > 0)
                .then(|| Duration::from_millis(self.ping_interval_ms)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error); `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.link.port.trim().is_empty() {
            return Err(Error::Config("link.port must not be empty".to_string()));
        }
        if self.link.baud_rate == 0 {
            return Err(Error::Config("link.baud_rate must be positive".to_string()));
        }
        if !(1..=MAX_READ_TIMEOUT_MS).contains(&self.link.read_timeout_ms) {
            return Err(Error::Config(format!(
                "link.read_timeout_ms must be between 1 and {}, got {}",
                MAX_READ_TIMEOUT_MS, self.link.read_timeout_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.link.port, "/dev/ttyUSB0");
        assert_eq!(config.link.baud_rate, 115_200);
        assert_eq!(config.link.read_timeout_ms, 50);
        assert_eq!(config.link.ping_interval_ms, 0);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[link]
port = "COM3"
baud_rate = 9600
satellite_id = 7
ping_interval_ms = 1000

[logging]
level = "debug"
"#;

        let config = Config::from_toml(toml_content).unwrap();
        assert_eq!(config.link.port, "COM3");
        assert_eq!(config.link.baud_rate, 9600);
        assert_eq!(config.link.satellite_id, 7);
        // Unlisted keys fall back to defaults
        assert_eq!(config.link.read_timeout_ms, 50);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.link.port, "/dev/ttyUSB0");
    }

    #[test]
    fn test_toml_serialization() {
        let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_string.contains("[link]"));
        assert!(toml_string.contains("[logging]"));
        assert!(toml_string.contains("baud_rate = 115200"));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tsat-ground.toml");

        let mut config = Config::default();
        config.link.port = "/dev/ttyACM1".to_string();
        config.link.ping_interval_ms = 500;
        config.to_file(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.link.port, "/dev/ttyACM1");
        assert_eq!(loaded.link.ping_interval_ms, 500);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(temp_dir.path().join("absent.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            Config::from_toml("[link]\nread_timeout_ms = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[link]\nread_timeout_ms = 5000"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[link]\nbaud_rate = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[link]\nport = \"  \""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            Config::from_toml("[link\nport = 1"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_link_settings() {
        let mut link = LinkConfig::default();
        assert_eq!(link.settings().ping_interval, None);

        link.ping_interval_ms = 250;
        link.satellite_id = 4;
        let settings = link.settings();
        assert_eq!(settings.ping_interval, Some(Duration::from_millis(250)));
        assert_eq!(settings.satellite_id, 4);
    }
}
