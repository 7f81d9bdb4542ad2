use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"relay_core=trace,info"`.
    pub level: LoggerLevel,
    /// Timezone of the RFC 3339 timestamps.
    pub tz: LoggerTimeZone,
    /// Include the record target (module path).
    pub with_targets: bool,
    /// Colorize text output when stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Color is used only when enabled in config and stdout is a terminal.
    ///
    /// Evaluated at initialization time so redirection is detected correctly.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.format, LoggerFormat::default());
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
    }

    #[test]
    fn partial_deserialization_uses_camel_case() {
        let json = r#"{"format": "json", "level": "relay_core=debug,warn", "withTargets": false}"#;
        let config: LoggerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "relay_core=debug,warn");
        assert!(!config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn invalid_level_fails_deserialization() {
        let json = r#"{"level": "relay_core=loud"}"#;
        assert!(serde_json::from_str::<LoggerConfig>(json).is_err());
    }

    #[test]
    fn color_disabled_in_config_wins() {
        let config = LoggerConfig {
            use_color: false,
            ..Default::default()
        };
        assert!(!config.should_use_color());
    }
}
