//! Rule trait for defining lint checks.

use crate::context::FileContext;
use crate::token::TokenStream;
use crate::types::{Edit, Severity, Violation};

/// Errors raised when a fix is requested for a violation.
///
/// These signal misuse by the caller, never a style problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    /// The violation carries no fix tag.
    #[error("violation is not fixable: {message}")]
    NotFixable {
        /// Message of the offending violation.
        message: String,
    },

    /// No fix is registered under this tag.
    #[error("no fix registered for tag '{tag}'")]
    Unsupported {
        /// The unknown tag.
        tag: String,
    },

    /// The violation does not record which token to fix.
    #[error("fixable violation has no token: {message}")]
    MissingToken {
        /// Message of the offending violation.
        message: String,
    },

    /// The recorded token index is past the end of the stream.
    #[error("token index {index} is out of range")]
    TokenOutOfRange {
        /// The recorded index.
        index: usize,
    },

    /// The fix only applies to tokens of another kind.
    #[error("token {index} cannot be fixed by '{tag}'")]
    WrongToken {
        /// The recorded index.
        index: usize,
        /// Tag of the requested fix.
        tag: String,
    },
}

/// A per-file lint check over a pre-lexed token stream.
///
/// # Example
///
/// ```ignore
/// use styleguide_lint_core::{FileContext, Rule, Violation};
///
/// pub struct NoNodes;
///
/// impl Rule for NoNodes {
///     fn name(&self) -> &'static str { "no-nodes" }
///     fn code(&self) -> &'static str { "WS100" }
///
///     fn check(&self, ctx: &FileContext) -> Vec<Violation> {
///         ctx.nodes()
///             .iter()
///             .map(|node| ctx.violation_at(self, node.start, "node blocks are not allowed"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "wmf-styleguide").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "WS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a single file and returns any violations found.
    ///
    /// Violations come back in emission order; sorting is up to the caller.
    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation>;

    /// Computes the edit resolving a violation this rule reported.
    ///
    /// Only called after the diagnostic pass of the file has finished.
    ///
    /// # Errors
    ///
    /// The default implementation knows no fixes and always fails.
    fn fix(&self, stream: &TokenStream, violation: &Violation) -> Result<Edit, FixError> {
        let _ = stream;
        Err(match &violation.fix_tag {
            Some(tag) => FixError::Unsupported { tag: tag.clone() },
            None => FixError::NotFixable {
                message: violation.message.clone(),
            },
        })
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
