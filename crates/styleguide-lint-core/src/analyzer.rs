//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{FixError, Rule, RuleBox};
use crate::token::TokenStream;
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name suffix of pre-lexed token dumps.
pub const TOKEN_FILE_SUFFIX: &str = ".tokens.json";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A token file is not a valid token stream.
    #[error("Invalid token stream in {path}: {message}")]
    Decode {
        /// Path to the file that failed to decode.
        path: PathBuf,
        /// Decode error message.
        message: String,
    },

    /// A fixed token stream could not be serialized.
    #[error("Failed to encode token stream for {path}: {message}")]
    Encode {
        /// Path of the file being rewritten.
        path: PathBuf,
        /// Encode error message.
        message: String,
    },

    /// A fix was requested that no rule can perform.
    #[error("Cannot fix violation in {path}: {source}")]
    Fix {
        /// File being fixed.
        path: PathBuf,
        /// Why the fix failed.
        source: FixError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fix: bool,
    fail_on_decode_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Enables fix mode: fixable violations are fixed and token files rewritten.
    #[must_use]
    pub fn fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Sets whether to fail on undecodable token files (default: false).
    #[must_use]
    pub fn fail_on_decode_error(mut self, fail: bool) -> Self {
        self.fail_on_decode_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            config: self.config.unwrap_or_default(),
            fix: self.fix,
            fail_on_decode_error: self.fail_on_decode_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Config,
    fix: bool,
    fail_on_decode_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all token files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery, IO or a requested fix fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} token files to analyze", files.len());

        for file_path in &files {
            match self.analyze_file(file_path) {
                Ok((violations, fixes)) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                    result.fixes_applied += fixes;
                }
                Err(AnalyzerError::Decode { path, message }) => {
                    warn!("Failed to decode {}: {}", path.display(), message);
                    if self.fail_on_decode_error {
                        return Err(AnalyzerError::Decode { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations ({} fixed) in {} files",
            result.violations.len(),
            result.fixes_applied,
            result.files_checked
        );

        Ok(result)
    }

    /// Runs every enabled rule over one stream, then fixes when enabled.
    ///
    /// Fixes are applied only after all rules have reported, so no rule ever
    /// sees a partially fixed stream. Returns the violations, with fixed ones
    /// flagged, and the number of edits applied.
    ///
    /// # Errors
    ///
    /// Returns [`FixError`] if a violation claims a fix its rule cannot make.
    pub fn check_stream(
        &self,
        path: &Path,
        stream: &mut TokenStream,
    ) -> Result<(Vec<Violation>, usize), FixError> {
        let mut reported: Vec<(usize, Vec<Violation>)> = Vec::new();
        {
            let ctx = FileContext::new(path, stream, &self.root);
            for (i, rule) in self.rules.iter().enumerate() {
                if !self.config.is_rule_enabled(rule.name()) {
                    debug!("Skipping disabled rule: {}", rule.name());
                    continue;
                }
                let violations = self.apply_severity_override(rule.name(), rule.check(&ctx));
                reported.push((i, violations));
            }
        }

        let mut fixes = 0;
        if self.fix {
            for (i, violations) in &mut reported {
                let rule = &self.rules[*i];
                for violation in violations.iter_mut().filter(|v| v.is_fixable()) {
                    let edit = rule.fix(stream, violation)?;
                    if stream.apply(&edit) {
                        violation.fixed = true;
                        fixes += 1;
                    }
                }
            }
        }

        Ok((reported.into_iter().flat_map(|(_, v)| v).collect(), fixes))
    }

    /// Analyzes a single token file.
    fn analyze_file(&self, path: &Path) -> Result<(Vec<Violation>, usize), AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut stream: TokenStream =
            serde_json::from_str(&content).map_err(|e| AnalyzerError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let (violations, fixes) =
            self.check_stream(path, &mut stream)
                .map_err(|source| AnalyzerError::Fix {
                    path: path.to_path_buf(),
                    source,
                })?;

        if fixes > 0 {
            debug!("Writing {} fixes to {}", fixes, path.display());
            let json = serde_json::to_string_pretty(&stream).map_err(|e| AnalyzerError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            std::fs::write(path, json)?;
        }

        Ok((violations, fixes))
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all token files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let pattern = format!("{}/**/*{TOKEN_FILE_SUFFIX}", self.root.display());
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/vendor/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edit, Severity};
    use std::fs;
    use tempfile::TempDir;

    /// Flags every regex token and upper-cases it when fixing.
    struct ShoutRegex;

    impl Rule for ShoutRegex {
        fn name(&self) -> &'static str {
            "shout-regex"
        }
        fn code(&self) -> &'static str {
            "TEST002"
        }
        fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
            ctx.stream
                .iter()
                .filter(|t| t.kind() == crate::TokenKind::Regex && t.text() != "LOUD")
                .map(|t| {
                    ctx.violation_at(self, t.index(), "quiet regex")
                        .with_fix_tag("shout")
                })
                .collect()
        }
        fn fix(&self, _stream: &TokenStream, violation: &Violation) -> Result<Edit, FixError> {
            Ok(Edit::new(violation.token.unwrap_or_default(), "LOUD"))
        }
    }

    const TOKENS: &str = r#"[
        {"kind": "NODE", "text": "node", "line": 1, "column": 1},
        {"kind": "WHITESPACE", "text": " ", "line": 1, "column": 5},
        {"kind": "REGEX", "text": "quiet", "line": 1, "column": 6}
    ]"#;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/vendor/x.pp.tokens.json")));
        assert!(!analyzer.should_exclude(Path::new("/foo/modules/x.pp.tokens.json")));
    }

    #[test]
    fn analyzes_token_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("manifests")).unwrap();
        fs::write(tmp.path().join("manifests/site.pp.tokens.json"), TOKENS).unwrap();
        fs::write(tmp.path().join("manifests/broken.pp.tokens.json"), "{").unwrap();
        fs::write(tmp.path().join("manifests/notes.json"), TOKENS).unwrap();

        let result = Analyzer::builder()
            .root(tmp.path())
            .rule(ShoutRegex)
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        let v = &result.violations[0];
        assert_eq!(v.location.file, PathBuf::from("manifests/site.pp.tokens.json"));
        assert_eq!((v.location.line, v.location.column), (1, 6));
        assert!(!v.fixed);
        assert!(result.has_errors());
    }

    #[test]
    fn decode_errors_can_be_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.pp.tokens.json"), "{").unwrap();
        let err = Analyzer::builder()
            .root(tmp.path())
            .fail_on_decode_error(true)
            .build()
            .unwrap()
            .analyze()
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Decode { .. }));
    }

    #[test]
    fn fix_mode_rewrites_token_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("site.pp.tokens.json");
        fs::write(&file, TOKENS).unwrap();

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .rule(ShoutRegex)
            .fix(true)
            .build()
            .unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.fixes_applied, 1);
        assert!(result.violations[0].fixed);
        assert!(!result.has_errors());

        let rewritten: TokenStream =
            serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(rewritten.get(2).unwrap().text(), "LOUD");

        // Second run finds nothing left to fix.
        let again = analyzer.analyze().unwrap();
        assert!(again.violations.is_empty());
    }

    #[test]
    fn severity_override_and_disabled_rules() {
        let mut config = Config::default();
        config.rules.insert(
            "shout-regex".into(),
            crate::config::RuleConfig {
                enabled: None,
                severity: Some(Severity::Warning),
            },
        );
        let analyzer = Analyzer::builder()
            .config(config.clone())
            .rule(ShoutRegex)
            .build()
            .unwrap();
        let mut stream: TokenStream = serde_json::from_str(TOKENS).unwrap();
        let (violations, _) = analyzer
            .check_stream(Path::new("site.pp"), &mut stream)
            .unwrap();
        assert_eq!(violations[0].severity, Severity::Warning);

        config.rules.get_mut("shout-regex").unwrap().enabled = Some(false);
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(ShoutRegex)
            .build()
            .unwrap();
        let (violations, _) = analyzer
            .check_stream(Path::new("site.pp"), &mut stream)
            .unwrap();
        assert!(violations.is_empty());
    }
}
