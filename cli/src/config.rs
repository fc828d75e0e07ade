//! Run configuration: protocol choice plus logging options
//!
//! Values come from defaults, then an optional JSON file, then command-line flags.

use crate::error::{CliError, Result};
use clap::ValueEnum;
use fftt_core::{Protocol, ProtocolVersion};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Protocol selector as spelled on the command line and in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolArg {
    /// 20 Hz bit spacing
    V1,
    /// 75 Hz bit spacing
    #[default]
    V2,
}

impl From<ProtocolArg> for ProtocolVersion {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::V1 => ProtocolVersion::V1,
            ProtocolArg::V2 => ProtocolVersion::V2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub log_to_file: bool,
    pub log_to_terminal: bool,
    /// Log file is `<file_prefix>.log`, relative to the working directory
    pub file_prefix: String,
    pub color_levels: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_to_terminal: true,
            file_prefix: "fftt".to_string(),
            color_levels: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub protocol: ProtocolArg,
    pub log: LogConfig,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub protocol: Option<ProtocolArg>,
    pub log_to_file: bool,
    pub no_terminal_log: bool,
    pub log_prefix: Option<String>,
    pub no_color: bool,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            CliError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Defaults (or `path`, when given) with `overrides` applied on top
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(protocol) = overrides.protocol {
            self.protocol = protocol;
        }
        if overrides.log_to_file {
            self.log.log_to_file = true;
        }
        if overrides.no_terminal_log {
            self.log.log_to_terminal = false;
        }
        if let Some(prefix) = &overrides.log_prefix {
            self.log.file_prefix = prefix.clone();
        }
        if overrides.no_color {
            self.log.color_levels = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.log.log_to_file && self.log.file_prefix.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "log file prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn protocol(&self) -> Protocol {
        Protocol::new(self.protocol.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.protocol, ProtocolArg::V2);
        assert!(config.log.log_to_terminal);
        assert!(!config.log.log_to_file);
        assert_eq!(config.protocol().freq_step, 75.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "protocol": "v1", "log": { "log_to_file": true } }"#).unwrap();
        assert_eq!(config.protocol, ProtocolArg::V1);
        assert!(config.log.log_to_file);
        assert!(config.log.log_to_terminal);
        assert_eq!(config.log.file_prefix, "fftt");
        assert_eq!(config.protocol().freq_step, 20.0);
    }

    #[test]
    fn test_unknown_protocol_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            serde_json::from_str(r#"{ "protocol": "v9" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::default();
        config.apply(&Overrides {
            protocol: Some(ProtocolArg::V1),
            log_to_file: true,
            no_terminal_log: true,
            log_prefix: Some("session".to_string()),
            no_color: true,
        });
        assert_eq!(config.protocol, ProtocolArg::V1);
        assert_eq!(
            config.log,
            LogConfig {
                log_to_file: true,
                log_to_terminal: false,
                file_prefix: "session".to_string(),
                color_levels: false,
            }
        );
    }

    #[test]
    fn test_resolve_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fftt.json");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{ "protocol": "v1", "log": {{ "color_levels": false }} }}"#).unwrap();

        let overrides = Overrides {
            protocol: Some(ProtocolArg::V2),
            ..Default::default()
        };
        let config = AppConfig::resolve(Some(&path), &overrides).unwrap();
        assert_eq!(config.protocol, ProtocolArg::V2);
        assert!(!config.log.color_levels);
    }

    #[test]
    fn test_resolve_reports_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            AppConfig::resolve(Some(&missing), &Overrides::default()),
            Err(CliError::Config(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::resolve(Some(&broken), &Overrides::default()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_empty_prefix_with_file_logging() {
        let overrides = Overrides {
            log_to_file: true,
            log_prefix: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AppConfig::resolve(None, &overrides),
            Err(CliError::InvalidArguments(_))
        ));
    }
}
