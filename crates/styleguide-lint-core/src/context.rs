//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::index::{definition_indexes, node_indexes, ResourceRecord};
use crate::rule::Rule;
use crate::token::TokenStream;
use crate::types::{Location, Violation};

/// Context provided to per-file rules.
///
/// Holds the file's token stream and its class/define index. The index is
/// built with [`definition_indexes`] unless the host supplies its own through
/// [`FileContext::with_definitions`].
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file.
    pub path: &'a Path,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Pre-lexed tokens of the file.
    pub stream: &'a TokenStream,
    /// Class and define declarations found in the file.
    pub definitions: Vec<ResourceRecord>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context, indexing classes and defines.
    #[must_use]
    pub fn new(path: &'a Path, stream: &'a TokenStream, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            stream,
            definitions: definition_indexes(stream),
        }
    }

    /// Replaces the class/define index with host-supplied records.
    #[must_use]
    pub fn with_definitions(mut self, definitions: Vec<ResourceRecord>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Node blocks of the file.
    #[must_use]
    pub fn nodes(&self) -> Vec<ResourceRecord> {
        node_indexes(self.stream)
    }

    /// Location of the token at `index`; line 1, column 1 if out of range.
    #[must_use]
    pub fn location_of(&self, index: usize) -> Location {
        let (line, column) = self
            .stream
            .get(index)
            .map_or((1, 1), |t| (t.line(), t.column()));
        Location::new(self.relative_path.clone(), line, column)
    }

    /// A violation of `rule` pointing at the token at `index`.
    #[must_use]
    pub fn violation_at<R: Rule + ?Sized>(
        &self,
        rule: &R,
        index: usize,
        message: impl Into<String>,
    ) -> Violation {
        Violation::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            self.location_of(index),
            message,
        )
        .with_token(index)
    }

    /// A violation of `rule` about the whole file or declaration.
    ///
    /// No single token represents it, so it is placed at line 1, column 1.
    #[must_use]
    pub fn violation_at_start<R: Rule + ?Sized>(
        &self,
        rule: &R,
        message: impl Into<String>,
    ) -> Violation {
        Violation::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            Location::new(self.relative_path.clone(), 1, 1),
            message,
        )
    }
}
