//! Configuration types for layout-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for layout-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing exit status (default: error).
    #[serde(default)]
    pub fail_on: Option<crate::Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration section of a rule, if present.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Severity at or above which violations fail a run.
    #[must_use]
    pub fn fail_threshold(&self) -> crate::Severity {
        self.fail_on.unwrap_or(crate::Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of check/fix passes per file when autocorrecting.
    #[serde(default = "default_fix_passes")]
    pub max_fix_passes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/vendor/**".to_string(), "**/node_modules/**".to_string()],
            respect_gitignore: true,
            max_fix_passes: default_fix_passes(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_fix_passes() -> usize {
    10
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option has an unsupported value.
    #[error("Invalid value {value:?} for `{key}` in [rules.{rule}]: expected one of {expected}")]
    InvalidOption {
        /// Rule the option belongs to.
        rule: String,
        /// Option key.
        key: String,
        /// Value found in the config.
        value: String,
        /// Accepted values, comma-separated.
        expected: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.analyzer.max_fix_passes, 10);
        assert_eq!(config.fail_threshold(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[analyzer]
root = "./app"
exclude = ["**/generated/**"]

[rules.indentation-consistency]
enabled = true
severity = "error"
style = "sectioned"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./app"));
        assert!(config.is_rule_enabled("indentation-consistency"));
        assert_eq!(
            config.rule_severity("indentation-consistency"),
            Some(Severity::Error)
        );
        assert_eq!(config.fail_threshold(), Severity::Warning);

        let rule_config = config.rule("indentation-consistency").unwrap();
        assert_eq!(rule_config.get_str("style", "normal"), "sectioned");
        assert_eq!(rule_config.get_str("missing", "normal"), "normal");
    }

    #[test]
    fn test_disabled_rule() {
        let config = Config::parse("[rules.indentation-consistency]\nenabled = false\n")
            .expect("Failed to parse");
        assert!(!config.is_rule_enabled("indentation-consistency"));
        assert!(config.is_rule_enabled("some-other-rule"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[analyzer\nroot = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
