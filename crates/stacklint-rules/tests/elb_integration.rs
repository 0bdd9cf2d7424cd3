//! Integration test: the ELB listener rule end-to-end via Analyzer.
//!
//! Uses fixture templates under `tests/fixtures/elb/`: one YAML file with
//! standalone listeners, one JSON file with a classic load balancer and one
//! file that does not parse.

use stacklint_core::{Analyzer, AnalyzerError, Config, Severity, Violation, PARSE_ERROR_CODE};
use stacklint_rules::{recommended_rules, ElbListenerProtocol};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/elb")
}

fn file_name(v: &Violation) -> String {
    v.file
        .file_name()
        .map_or_else(String::new, |f| f.to_string_lossy().into_owned())
}

fn summary<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Vec<String> {
    violations
        .into_iter()
        .map(|v| format!("{} {} {}", file_name(v), v.path, v.message))
        .collect()
}

// ── Happy path: findings from every fixture ──

#[test]
fn detects_listener_violations_across_formats() {
    let analyzer = Analyzer::builder()
        .path(fixture_root())
        .rule(ElbListenerProtocol::new())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 3, "README.md must not be discovered");

    let parse_errors: Vec<&Violation> = result
        .violations
        .iter()
        .filter(|v| v.code == PARSE_ERROR_CODE)
        .collect();
    assert_eq!(parse_errors.len(), 1);
    assert_eq!(file_name(parse_errors[0]), "broken.yaml");
    assert!(parse_errors[0].path.is_empty());
    assert!(parse_errors[0].message.starts_with("Invalid YAML"));

    let elb = result.violations.iter().filter(|v| v.code == "E2503");
    assert_eq!(
        summary(elb),
        vec![
            "classic.json Resources/Classic/Properties/Listeners/1/Protocol \
             Certificates should be specified when using HTTPS for Resources/Classic/Properties/Listeners",
            "classic.json Resources/Classic/Properties/Listeners/3/Protocol \
             Protocol is invalid for Resources/Classic/Properties/Listeners",
            "listener_v2.yaml Resources/SecureListener/Properties/Protocol \
             Certificates should be specified when using HTTPS for Resources/SecureListener/Properties",
            "listener_v2.yaml Resources/FtpListener/Properties/Protocol \
             Protocol is invalid for Resources/FtpListener/Properties",
        ]
    );

    let first = &result.violations[1];
    assert_eq!(first.rule, "Resource ELB Properties");
    assert_eq!(first.severity, Severity::Error);
    assert!(first
        .doc_ref
        .as_deref()
        .is_some_and(|url| url.ends_with("aws-properties-ec2-elb-listener.html")));
    assert_eq!(result.exit_code(), 2);
}

#[test]
fn single_file_path_is_checked_directly() {
    let analyzer = Analyzer::builder()
        .path(fixture_root().join("listener_v2.yaml"))
        .rule(ElbListenerProtocol::new())
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 1);
    assert_eq!(result.violations.len(), 2);
    assert!(result.violations.iter().all(|v| file_name(v) == "listener_v2.yaml"));
}

#[test]
fn recommended_preset_matches_explicit_rule() {
    let mut builder = Analyzer::builder().path(fixture_root().join("classic.json"));
    for rule in recommended_rules() {
        builder = builder.rule_box(rule);
    }
    let result = builder.build().unwrap().analyze().unwrap();
    assert_eq!(result.violations.len(), 2);
}

// ── Configuration ──

#[test]
fn severity_override_combines_exit_bits() {
    let config = Config::parse("[rules.E2503]\nseverity = \"warning\"\n").unwrap();
    let analyzer = Analyzer::builder()
        .path(fixture_root())
        .rule(ElbListenerProtocol::new())
        .config(config)
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    assert!(result
        .violations
        .iter()
        .filter(|v| v.code == "E2503")
        .all(|v| v.severity == Severity::Warning));
    // The parse error keeps its error severity.
    assert_eq!(result.exit_code(), 2 | 4);
    assert_eq!(result.count_by_severity(), (1, 4, 0));
}

#[test]
fn ignore_checks_and_exclude_remove_everything() {
    let config = Config::parse("ignore_checks = [\"E2503\"]\n").unwrap();
    let analyzer = Analyzer::builder()
        .path(fixture_root())
        .rule(ElbListenerProtocol::new())
        .config(config)
        .exclude("**/broken.yaml")
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    assert_eq!(result.files_checked, 2);
    assert!(result.violations.is_empty());
    assert_eq!(result.exit_code(), 0);
}

// ── Failure modes ──

#[test]
fn fail_on_parse_error_aborts() {
    let analyzer = Analyzer::builder()
        .path(fixture_root())
        .rule(ElbListenerProtocol::new())
        .fail_on_parse_error(true)
        .build()
        .unwrap();

    match analyzer.analyze() {
        Err(AnalyzerError::Load { path, .. }) => {
            assert!(path.ends_with("broken.yaml"));
        }
        other => panic!("expected load error, got {other:?}"),
    }
}
