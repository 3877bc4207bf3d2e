//! Configuration management for buildchain
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Command-line flags override them through [`ConfigOverrides`].
//!
//! # Environment Variables
//!
//! - `BUILDCHAIN_PROGRAM`: Toolchain driver to invoke - default: "cargo"
//! - `BUILDCHAIN_BACKTRACE`: Value exported as `RUST_BACKTRACE` to the debug build - default: "full"
//! - `BUILDCHAIN_SEPARATOR`: Print blank lines between stages (true|false) - default: "true"
//! - `BUILDCHAIN_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use buildchain::BuildchainConfig;
//!
//! let config = BuildchainConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;
use tracing::Level;

const DEFAULT_PROGRAM: &str = "cargo";
const DEFAULT_BACKTRACE: &str = "full";
const DEFAULT_SEPARATOR: bool = true;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Command-line values that take precedence over `BUILDCHAIN_*` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub program: Option<String>,
    pub log_level: Option<String>,
    pub separator: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildchainConfig {
    /// Toolchain driver invoked for every stage
    pub program: String,

    /// `RUST_BACKTRACE` value for the debug build
    pub backtrace: String,

    /// Print blank lines between stages
    pub separator: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BuildchainConfig {
    /// Loads configuration from `BUILDCHAIN_*` variables, falling back to defaults
    fn default() -> Self {
        let program = env::var("BUILDCHAIN_PROGRAM").unwrap_or_else(|_| DEFAULT_PROGRAM.to_string());

        let backtrace =
            env::var("BUILDCHAIN_BACKTRACE").unwrap_or_else(|_| DEFAULT_BACKTRACE.to_string());

        let separator = env::var("BUILDCHAIN_SEPARATOR")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_SEPARATOR);

        let log_level = env::var("BUILDCHAIN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            program,
            backtrace,
            separator,
            log_level,
        }
    }
}

impl BuildchainConfig {
    /// Loads from the environment, then applies `overrides`
    pub fn from_env_with(overrides: &ConfigOverrides) -> Self {
        let mut config = Self::default();
        config.apply(overrides);
        config
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(program) = &overrides.program {
            self.program = program.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.to_lowercase();
        }
        if let Some(separator) = overrides.separator {
            self.separator = separator;
        }
    }

    /// Tracing level for the configured log level. Unknown values map to INFO;
    /// `validate` rejects them first.
    pub fn level(&self) -> Level {
        match self.log_level.as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the program or backtrace value is empty, or
    /// the log level is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Toolchain program must not be empty".to_string(),
            ));
        }

        if self.backtrace.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Backtrace value must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("program".to_string(), self.program.clone());
        map.insert("backtrace".to_string(), self.backtrace.clone());
        map.insert("separator".to_string(), self.separator.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());
        map
    }
}

impl fmt::Display for BuildchainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buildchain Configuration:")?;
        writeln!(f, "  Program: {}", self.program)?;
        writeln!(f, "  Backtrace: {}", self.backtrace)?;
        writeln!(f, "  Separator: {}", self.separator)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets an environment variable for the lifetime of the guard
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("BUILDCHAIN_PROGRAM"),
            EnvGuard::unset("BUILDCHAIN_BACKTRACE"),
            EnvGuard::unset("BUILDCHAIN_SEPARATOR"),
            EnvGuard::unset("BUILDCHAIN_LOG_LEVEL"),
        ];

        let config = BuildchainConfig::default();

        assert_eq!(config.program, DEFAULT_PROGRAM);
        assert_eq!(config.backtrace, DEFAULT_BACKTRACE);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let _guards = vec![
            EnvGuard::set("BUILDCHAIN_PROGRAM", "cross"),
            EnvGuard::set("BUILDCHAIN_BACKTRACE", "1"),
            EnvGuard::set("BUILDCHAIN_SEPARATOR", "false"),
            EnvGuard::set("BUILDCHAIN_LOG_LEVEL", "DEBUG"),
        ];

        let config = BuildchainConfig::default();

        assert_eq!(config.program, "cross");
        assert_eq!(config.backtrace, "1");
        assert!(!config.separator);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_separator_falls_back() {
        let _guard = EnvGuard::set("BUILDCHAIN_SEPARATOR", "sometimes");
        let config = BuildchainConfig::default();
        assert!(config.separator);
    }

    #[test]
    fn test_validation_rejects_empty_program() {
        let config = BuildchainConfig {
            program: "  ".to_string(),
            backtrace: "full".to_string(),
            separator: true,
            log_level: "info".to_string(),
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("program"));
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let config = BuildchainConfig {
            program: "cargo".to_string(),
            backtrace: "full".to_string(),
            separator: true,
            log_level: "loud".to_string(),
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(msg)) if msg.contains("loud")
        ));
    }

    #[test]
    #[serial]
    fn test_overrides_win_over_env() {
        let _guards = vec![
            EnvGuard::set("BUILDCHAIN_PROGRAM", "cross"),
            EnvGuard::set("BUILDCHAIN_LOG_LEVEL", "loud"),
            EnvGuard::set("BUILDCHAIN_SEPARATOR", "false"),
        ];

        let config = BuildchainConfig::from_env_with(&ConfigOverrides {
            program: Some("cargo-nightly".to_string()),
            log_level: Some("DEBUG".to_string()),
            separator: Some(true),
        });

        assert_eq!(config.program, "cargo-nightly");
        assert_eq!(config.log_level, "debug");
        assert!(config.separator);
        assert!(config.validate().is_ok());
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_empty_overrides_keep_env() {
        let _guards = vec![
            EnvGuard::set("BUILDCHAIN_PROGRAM", "cross"),
            EnvGuard::set("BUILDCHAIN_LOG_LEVEL", "warn"),
        ];

        let config = BuildchainConfig::from_env_with(&ConfigOverrides::default());

        assert_eq!(config.program, "cross");
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    #[serial]
    fn test_invalid_env_level_without_override_is_rejected() {
        let _guard = EnvGuard::set("BUILDCHAIN_LOG_LEVEL", "loud");
        let config = BuildchainConfig::from_env_with(&ConfigOverrides::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_and_map() {
        let config = BuildchainConfig {
            program: "cargo".to_string(),
            backtrace: "full".to_string(),
            separator: false,
            log_level: "warn".to_string(),
        };

        let display = config.to_string();
        assert!(display.contains("Program: cargo"));
        assert!(display.contains("Separator: false"));

        let map = config.to_display_map();
        assert_eq!(map.get("backtrace"), Some(&"full".to_string()));
        assert_eq!(map.len(), 4);
    }
}
