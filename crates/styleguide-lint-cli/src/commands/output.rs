//! Shared output formatting for lint results.

use anyhow::Result;
use styleguide_lint_core::{LintResult, Severity, Violation};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = if violation.fixed {
            "\x1b[32mfixed\x1b[0m"
        } else {
            match violation.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            }
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(tag) = fix_hint(violation) {
            println!("  = help: fixable with --fix ({tag})");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s), {} fixed\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked, result.fixes_applied
    );
}

/// Fix tag of a violation that is fixable but was not fixed.
fn fix_hint(violation: &Violation) -> Option<&str> {
    if violation.fixed {
        None
    } else {
        violation.fix_tag.as_deref()
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in result.outstanding() {
        println!("{violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styleguide_lint_core::Location;

    #[test]
    fn only_unfixed_violations_get_a_hint() {
        let mut v = Violation::new(
            "WS001",
            "wmf-styleguide",
            Severity::Error,
            Location::new("site.pp".into(), 1, 6),
            "wmf-style: node regex must match from the start, add ^: db1",
        )
        .with_fix_tag("node_regex_start");
        assert_eq!(fix_hint(&v), Some("node_regex_start"));
        v.fixed = true;
        assert_eq!(fix_hint(&v), None);
    }
}
