//! Integration test: the wmf-styleguide check end-to-end via Analyzer.
//!
//! Manifests are tokenized with the test tokenizer and written as
//! `*.tokens.json` dumps into a temporary tree, the way the host lexer
//! would leave them.

use std::fs;
use std::path::Path;

use styleguide_lint_core::testing::tokenize;
use styleguide_lint_core::{Analyzer, Config, Severity, TokenStream};
use styleguide_lint_rules::{all_rules, WmfStyleguide};

fn write_tokens(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("fixture dir should be created");
    let json = serde_json::to_string(&tokenize(source)).expect("tokens should serialize");
    fs::write(path, json).expect("fixture should be written");
}

fn read_tokens(path: &Path) -> TokenStream {
    let content = fs::read_to_string(path).expect("token file should exist");
    serde_json::from_str(&content).expect("token file should decode")
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    write_tokens(
        dir.path(),
        "modules/profile/manifests/db.pp.tokens.json",
        "class profile::db (\n  $port = hiera('profile::db::port'),\n) {\n  include ::mysql\n}\n",
    );
    write_tokens(
        dir.path(),
        "modules/role/manifests/db.pp.tokens.json",
        "class role::db {\n  system::role { 'db': }\n  include ::profile::db\n}\n",
    );
    write_tokens(
        dir.path(),
        "manifests/site.pp.tokens.json",
        "node /db1001\\.eqiad\\.wmnet$/ {\n  role(db)\n}\n",
    );
    dir
}

#[test]
fn reports_violations_across_files() {
    let dir = fixture();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 3);
    let found: Vec<_> = result
        .violations
        .iter()
        .map(|v| {
            (
                v.location.file.to_string_lossy().into_owned(),
                v.location.line,
                v.message.as_str(),
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![
            (
                "manifests/site.pp.tokens.json".to_string(),
                1,
                "wmf-style: node regex must match from the start, add ^: db1001\\.eqiad\\.wmnet$"
            ),
            (
                "manifests/site.pp.tokens.json".to_string(),
                1,
                "wmf-style: node regex must not be anchored at the end, remove $: db1001\\.eqiad\\.wmnet$"
            ),
            (
                "manifests/site.pp.tokens.json".to_string(),
                1,
                "wmf-style: node regex must not contain the wmnet domain: db1001\\.eqiad\\.wmnet$"
            ),
            (
                "modules/profile/manifests/db.pp.tokens.json".to_string(),
                2,
                "wmf-style: Parameter 'port' of class 'profile::db' uses deprecated hiera, use lookup instead"
            ),
            (
                "modules/profile/manifests/db.pp.tokens.json".to_string(),
                4,
                "wmf-style: profile 'profile::db' includes non-profile class mysql"
            ),
        ]
    );
    assert!(result.has_errors());
    assert_eq!(result.fixes_applied, 0);
}

#[test]
fn fix_mode_rewrites_node_regex() {
    let dir = fixture();
    let site = dir.path().join("manifests/site.pp.tokens.json");

    let result = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .fix(true)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.fixes_applied, 3);
    assert_eq!(result.outstanding().count(), 2);
    let stream = read_tokens(&site);
    assert_eq!(stream.get(2).map(|t| t.text()), Some("^db1001\\.eqiad\\."));

    // A second run finds nothing left to fix in the site manifest.
    let rerun = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .fix(true)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");
    assert_eq!(rerun.fixes_applied, 0);
    assert_eq!(rerun.violations.len(), 2);
}

#[test]
fn config_drives_rules_and_severity() {
    let dir = fixture();
    let config = Config::parse(
        r#"
[styleguide]
profile_include_modules = ["passwords", "mysql"]

[rules.wmf-styleguide]
severity = "warning"
"#,
    )
    .expect("config should parse");

    let mut builder = Analyzer::builder().root(dir.path()).config(config.clone());
    for rule in all_rules(&config.styleguide) {
        builder = builder.rule_box(rule);
    }
    let result = builder
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.violations.len(), 4);
    assert!(result
        .violations
        .iter()
        .all(|v| v.severity == Severity::Warning));
    assert!(!result.has_errors());
    assert!(result.has_warnings());
}

#[test]
fn disabled_rule_reports_nothing() {
    let dir = fixture();
    let config =
        Config::parse("[rules.wmf-styleguide]\nenabled = false\n").expect("config should parse");

    let result = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .rule(WmfStyleguide::new())
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.files_checked, 3);
    assert!(result.violations.is_empty());
}

#[test]
fn undecodable_token_file_is_skipped() {
    let dir = fixture();
    fs::write(dir.path().join("broken.pp.tokens.json"), "{ not json").expect("write");

    let result = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");
    assert_eq!(result.files_checked, 3);

    let strict = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .fail_on_decode_error(true)
        .build()
        .expect("analyzer should build")
        .analyze();
    assert!(strict.is_err());
}

#[test]
fn fix_mode_keeps_unmodelled_tokens_intact() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let site = dir.path().join("site.pp.tokens.json");
    let original = serde_json::json!([
        {"kind": "NODE", "text": "node", "line": 1, "column": 1},
        {"kind": "WHITESPACE", "text": " ", "line": 1, "column": 5},
        {"kind": "REGEX", "text": "db1", "line": 1, "column": 6, "value": "/db1/"},
        {"kind": "WHITESPACE", "text": " ", "line": 1, "column": 11},
        {"kind": "LBRACE", "text": "{", "line": 1, "column": 12},
        {"kind": "NEWLINE", "text": "\n", "line": 1, "column": 13},
        {"kind": "VARIABLE", "text": "x", "line": 2, "column": 3},
        {"kind": "EQUALS", "text": "=", "line": 2, "column": 6},
        {"kind": "DQPRE", "text": "a", "line": 2, "column": 8, "length": 2},
        {"kind": "UNENC_VARIABLE", "text": "y", "line": 2, "column": 10},
        {"kind": "DQPOST", "text": "", "line": 2, "column": 12, "length": 1},
        {"kind": "PLUS", "text": "+", "line": 2, "column": 14},
        {"kind": "NUMBER", "text": "1", "line": 2, "column": 16},
        {"kind": "NEWLINE", "text": "\n", "line": 2, "column": 17},
        {"kind": "RBRACE", "text": "}", "line": 3, "column": 1}
    ]);
    fs::write(&site, original.to_string()).expect("fixture should be written");

    let result = Analyzer::builder()
        .root(dir.path())
        .rule(WmfStyleguide::new())
        .fix(true)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");
    assert_eq!(result.fixes_applied, 1);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&site).expect("token file should exist"))
            .expect("token file should decode");
    let mut expected = original;
    expected[2]["text"] = "^db1".into();
    assert_eq!(written, expected);
}
