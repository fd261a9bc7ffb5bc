//! Runtime configuration
//!
//! Loaded from a TOML file, then overridden by `KLAXON_`-prefixed environment
//! variables, then validated. Every section has defaults so an empty file (or
//! no file at all) yields a working configuration.

use crate::errors::{KlaxonError, Result};
use crate::kind::EmergencyKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KlaxonConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Dispatch configuration
    pub dispatch: DispatchConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Kinds composed at startup; others are rejected as unregistered
    pub enabled_kinds: Vec<EmergencyKind>,

    /// Make the registry read-only once startup composition finishes
    pub freeze_registry: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            enabled_kinds: EmergencyKind::ALL.to_vec(),
            freeze_registry: true,
        }
    }
}

impl KlaxonConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| KlaxonError::config(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KlaxonError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from an optional file, apply the process environment, and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `KLAXON_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_from_vars(std::env::vars())
    }

    /// Apply `KLAXON_*` overrides from an explicit variable list
    pub fn merge_from_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "KLAXON_LOG_LEVEL" => self.logging.level = value.trim().to_lowercase(),
                "KLAXON_ENABLED_KINDS" => {
                    self.dispatch.enabled_kinds = value
                        .split(',')
                        .filter(|part| !part.trim().is_empty())
                        .map(str::parse::<EmergencyKind>)
                        .collect::<Result<Vec<EmergencyKind>>>()
                        .map_err(|e| KlaxonError::config(format!("KLAXON_ENABLED_KINDS: {e}")))?;
                }
                "KLAXON_FREEZE_REGISTRY" => {
                    self.dispatch.freeze_registry = value.trim().parse().map_err(|_| {
                        KlaxonError::config(format!(
                            "KLAXON_FREEZE_REGISTRY must be true or false, got '{value}'"
                        ))
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(KlaxonError::config(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got '{}'",
                self.logging.level
            )));
        }
        if self.dispatch.enabled_kinds.is_empty() {
            return Err(KlaxonError::config(
                "dispatch.enabled_kinds must name at least one kind",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = KlaxonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dispatch.enabled_kinds.len(), 4);
        assert!(config.dispatch.freeze_registry);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = KlaxonConfig::from_toml_str(
            r#"
            [dispatch]
            enabled_kinds = ["Fire", "Flood"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.dispatch.enabled_kinds,
            vec![EmergencyKind::Fire, EmergencyKind::Flood]
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_kinds_use_same_rule_as_env() {
        let from_file =
            KlaxonConfig::from_toml_str("[dispatch]\nenabled_kinds = [\"fire\", \"FLOOD\"]\n").unwrap();

        let mut from_env = KlaxonConfig::default();
        from_env
            .merge_from_vars([("KLAXON_ENABLED_KINDS", "fire,FLOOD")])
            .unwrap();

        assert_eq!(from_file.dispatch.enabled_kinds, from_env.dispatch.enabled_kinds);
        assert_eq!(
            from_file.dispatch.enabled_kinds,
            vec![EmergencyKind::Fire, EmergencyKind::Flood]
        );
    }

    #[test]
    fn test_unknown_kind_in_toml_is_rejected() {
        let result = KlaxonConfig::from_toml_str("[dispatch]\nenabled_kinds = [\"Earthquake\"]\n");
        assert_matches!(result, Err(KlaxonError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = KlaxonConfig::default();
        config
            .merge_from_vars([
                ("KLAXON_LOG_LEVEL", "DEBUG"),
                ("KLAXON_ENABLED_KINDS", "security, fire"),
                ("KLAXON_FREEZE_REGISTRY", "false"),
                ("UNRELATED", "ignored"),
            ])
            .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.dispatch.enabled_kinds,
            vec![EmergencyKind::Security, EmergencyKind::Fire]
        );
        assert!(!config.dispatch.freeze_registry);
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = KlaxonConfig::default();
        assert!(config
            .merge_from_vars([("KLAXON_ENABLED_KINDS", "fire,tornado")])
            .is_err());
        assert!(config
            .merge_from_vars([("KLAXON_FREEZE_REGISTRY", "sometimes")])
            .is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = KlaxonConfig::default();
        config.logging.level = "loud".into();
        assert_matches!(config.validate(), Err(KlaxonError::Config { .. }));

        let mut config = KlaxonConfig::default();
        config.dispatch.enabled_kinds.clear();
        assert_matches!(config.validate(), Err(KlaxonError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();

        let config = KlaxonConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "warn");

        let missing = KlaxonConfig::load_from_file(Path::new("/nonexistent/klaxon.toml"));
        assert_matches!(missing, Err(KlaxonError::Config { .. }));
    }
}
