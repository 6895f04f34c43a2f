//! Configuration types for the mapper
//!
//! Every field has a serde default, so an empty JSON object is a valid
//! configuration.

use serde::{Deserialize, Serialize};

/// Main mapper configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// How strictly payload values are coerced to field types
    #[serde(default)]
    pub coercion: CoercionMode,

    /// What to do when a caller requests a group the table does not declare
    #[serde(default)]
    pub unknown_groups: UnknownGroupPolicy,
}

impl MapperConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coercion mode
    pub fn with_coercion(mut self, coercion: CoercionMode) -> Self {
        self.coercion = coercion;
        self
    }

    /// Set the unknown group policy
    pub fn with_unknown_groups(mut self, policy: UnknownGroupPolicy) -> Self {
        self.unknown_groups = policy;
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Coercion strictness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Accept textual numbers and booleans, render scalars as text
    #[default]
    Lenient,
    /// Only accept a payload value of exactly the declared kind
    Strict,
}

impl CoercionMode {
    pub fn is_lenient(&self) -> bool {
        matches!(self, CoercionMode::Lenient)
    }
}

/// Policy for requested groups that a table does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownGroupPolicy {
    /// Fail with a configuration error
    #[default]
    Reject,
    /// Skip the group and log a warning
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MapperConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MapperConfig::default());
        assert_eq!(config.coercion, CoercionMode::Lenient);
        assert_eq!(config.unknown_groups, UnknownGroupPolicy::Reject);
    }

    #[test]
    fn test_parse_config() {
        let config =
            MapperConfig::from_json_str(r#"{"coercion": "strict", "unknown_groups": "ignore"}"#)
                .unwrap();
        assert_eq!(config.coercion, CoercionMode::Strict);
        assert_eq!(config.unknown_groups, UnknownGroupPolicy::Ignore);
    }

    #[test]
    fn test_parsed_config_builds_mapper() {
        let config = MapperConfig::from_json_str(r#"{"coercion": "strict"}"#).unwrap();
        let mapper = crate::Mapper::new(config);
        assert_eq!(mapper.coercion(), CoercionMode::Strict);
        assert_eq!(mapper.config().unknown_groups, UnknownGroupPolicy::Reject);
    }

    #[test]
    fn test_invalid_config_is_configuration_error() {
        let err = MapperConfig::from_json_str(r#"{"coercion": "sloppy"}"#).unwrap_err();
        assert!(err.is_configuration());
    }
}
