//! Configuration types for styleguide-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for styleguide-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Organisation conventions checked by the styleguide rules.
    #[serde(default)]
    pub styleguide: StyleguideConfig,

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
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/vendor/**".to_string()],
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Module names and allow/deny lists encoding the architecture conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleguideConfig {
    /// Module holding profiles.
    pub profile_module: String,
    /// Module holding roles.
    pub role_module: String,
    /// Modules besides the profile module a profile may include from.
    pub profile_include_modules: Vec<String>,
    /// Individual classes a profile may include.
    pub profile_include_classes: Vec<String>,
    /// Resource type marking a class as a role.
    pub role_resource: String,
    /// Defines that must no longer be declared.
    pub deprecated_defines: Vec<String>,
    /// Resource types a node block may still declare.
    pub node_allowed_resources: Vec<String>,
    /// Domain suffixes node regexes must not spell out.
    pub disallowed_node_domains: Vec<String>,
}

impl Default for StyleguideConfig {
    fn default() -> Self {
        Self {
            profile_module: "profile".to_string(),
            role_module: "role".to_string(),
            profile_include_modules: vec!["passwords".to_string()],
            profile_include_classes: vec!["lvs::realserver".to_string()],
            role_resource: "system::role".to_string(),
            deprecated_defines: vec!["base::service_unit".to_string()],
            node_allowed_resources: vec!["interface::add_ip6_mapped".to_string()],
            disallowed_node_domains: vec!["wmnet".to_string(), "wikimedia.org".to_string()],
        }
    }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.styleguide.profile_module, "profile");
        assert_eq!(config.styleguide.role_module, "role");
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("wmf-styleguide"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
root = "./manifests"
exclude = ["**/generated/**"]

[styleguide]
profile_module = "prof"
deprecated_defines = ["base::service_unit", "monitoring::graphite_threshold"]

[rules.wmf-styleguide]
enabled = false
severity = "warning"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./manifests"));
        assert_eq!(config.styleguide.profile_module, "prof");
        // Unspecified keys keep their defaults.
        assert_eq!(config.styleguide.role_module, "role");
        assert_eq!(config.styleguide.deprecated_defines.len(), 2);
        assert!(!config.is_rule_enabled("wmf-styleguide"));
        assert_eq!(
            config.rule_severity("wmf-styleguide"),
            Some(crate::Severity::Warning)
        );
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[styleguide\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
