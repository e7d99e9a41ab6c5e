//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use styleguide_lint_core::Analyzer;
use styleguide_lint_rules::all_rules;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `false` when errors remain after fixing.
pub fn run(
    path: &Path,
    format: OutputFormat,
    fix: bool,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = source.load()?;
    let rules = all_rules(&config.styleguide);

    let mut builder = Analyzer::builder().root(path).config(config).fix(fix);
    for pattern in exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    Ok(!result.has_errors())
}
