//! Core types for lint violations, fixes and results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

/// A text replacement for one token, produced by a rule's fix.
///
/// Edits are applied by the driver after the diagnostic pass, see
/// [`TokenStream::apply`](crate::TokenStream::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Index of the token to rewrite.
    pub token: usize,
    /// Replacement text for the token value.
    pub new_text: String,
}

impl Edit {
    /// Creates a new edit.
    #[must_use]
    pub fn new(token: usize, new_text: impl Into<String>) -> Self {
        Self {
            token,
            new_text: new_text.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "WS001").
    pub code: String,
    /// Rule name (e.g., "wmf-styleguide").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Identifies the fix able to resolve this violation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_tag: Option<String>,
    /// Index of the offending token in the file's stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<usize>,
    /// Set once a fix has been applied for this violation.
    #[serde(default)]
    pub fixed: bool,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fix_tag: None,
            token: None,
            fixed: false,
        }
    }

    /// Records the offending token.
    #[must_use]
    pub fn with_token(mut self, token: usize) -> Self {
        self.token = Some(token);
        self
    }

    /// Marks this violation as fixable by the fix named `tag`.
    #[must_use]
    pub fn with_fix_tag(mut self, tag: impl Into<String>) -> Self {
        self.fix_tag = Some(tag.into());
        self
    }

    /// Returns true if a fix is known for this violation.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix_tag.is_some()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.fixed {
            "FIXED".to_string()
        } else {
            self.severity.to_string()
        };
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            status,
            self.code,
            self.message
        )
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of fixes applied.
    #[serde(default)]
    pub fixes_applied: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any unfixed errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.outstanding().any(|v| v.severity == Severity::Error)
    }

    /// Returns true if there are any unfixed warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.outstanding().any(|v| v.severity >= Severity::Warning)
    }

    /// Violations that have not been fixed.
    pub fn outstanding(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.fixed)
    }

    /// Counts unfixed violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for v in self.outstanding() {
            match v.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }
}
