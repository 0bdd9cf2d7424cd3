//! Core types for findings, violations and results.

use crate::path::DocPath;
use miette::Diagnostic;
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

impl Severity {
    /// Derives the severity from a rule id prefix (`E`, `W`, `I`).
    ///
    /// Unknown prefixes are treated as errors.
    #[must_use]
    pub fn from_rule_id(id: &str) -> Self {
        match id.chars().next() {
            Some('W') => Self::Warning,
            Some('I') => Self::Info,
            _ => Self::Error,
        }
    }

    /// Bit used in the process exit code when a violation of this severity
    /// is reported.
    #[must_use]
    pub fn exit_bit(self) -> i32 {
        match self {
            Self::Error => 2,
            Self::Warning => 4,
            Self::Info => 8,
        }
    }
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

/// A problem reported by a rule: where it is and what is wrong.
///
/// Findings are created by rules during one evaluation and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    path: DocPath,
    message: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(path: DocPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Path of the offending node.
    #[must_use]
    pub fn path(&self) -> &DocPath {
        &self.path
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A finding attributed to a rule and a template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule id (e.g., "E2503").
    pub code: String,
    /// Short description of the rule (e.g., "Resource ELB Properties").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Template file the violation was found in.
    pub file: PathBuf,
    /// Path of the offending node inside the template.
    pub path: DocPath,
    /// Human-readable message.
    pub message: String,
    /// Documentation link for the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        file: PathBuf,
        finding: Finding,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            file,
            path: finding.path,
            message: finding.message,
            doc_ref: None,
        }
    }

    /// Adds a documentation link to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        self.format_with_severity(&self.severity.to_string())
    }

    /// Like [`Violation::format`], with `severity` rendered in place of the
    /// plain severity name (e.g. a colored label).
    #[must_use]
    pub fn format_with_severity(&self, severity: &str) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {}\n", self.code, self.rule);
        let _ = writeln!(output, "  {severity}: {}", self.message);
        let _ = writeln!(output, "  --> {}:{}", self.file.display(), self.path);
        if let Some(doc_ref) = &self.doc_ref {
            let _ = writeln!(output, "  = see: {doc_ref}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file.display(),
            self.path,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: String,
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            code: v.code.clone(),
            message: v.message.clone(),
            help: Some(match &v.doc_ref {
                Some(doc_ref) => format!("at {} in {} (see: {doc_ref})", v.path, v.file.display()),
                None => format!("at {} in {}", v.path, v.file.display()),
            }),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of templates checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Process exit code: the OR of [`Severity::exit_bit`] over every
    /// reported severity, or 0 when clean.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.violations
            .iter()
            .fold(0, |code, v| code | v.severity.exit_bit())
    }

    /// Formats violations as a plain-text report.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for v in &self.violations {
            let _ = writeln!(report, "{}", v.format());
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Found {} error(s), {} warning(s), {} info(s) in {} template(s)",
            errors, warnings, infos, self.files_checked
        );
        report
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "E2503",
            "Resource ELB Properties",
            severity,
            PathBuf::from("stack.yaml"),
            Finding::new(
                DocPath::from_keys(["Resources", "Listener", "Properties", "Protocol"]),
                "Protocol is invalid for Resources/Listener/Properties",
            ),
        )
    }

    #[test]
    fn severity_from_rule_id_prefix() {
        assert_eq!(Severity::from_rule_id("E2503"), Severity::Error);
        assert_eq!(Severity::from_rule_id("W2001"), Severity::Warning);
        assert_eq!(Severity::from_rule_id("I3011"), Severity::Info);
        assert_eq!(Severity::from_rule_id(""), Severity::Error);
    }

    #[test]
    fn violation_keeps_finding_path() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.path.to_string(), "Resources/Listener/Properties/Protocol");
    }

    #[test]
    fn violation_display_is_one_line() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"stack.yaml:Resources/Listener/Properties/Protocol: error [E2503] Protocol is invalid for Resources/Listener/Properties"
        );
    }

    #[test]
    fn violation_format_includes_doc_ref() {
        let v = make_violation(Severity::Error).with_doc_ref("https://example.com/elb");
        assert!(v.format().contains("= see: https://example.com/elb"));
        assert!(!make_violation(Severity::Error).format().contains("see:"));
    }

    #[test]
    fn format_with_custom_severity_label() {
        let v = make_violation(Severity::Error);
        let labelled = v.format_with_severity("ERR");
        assert!(labelled.contains("  ERR: Protocol is invalid"));
        assert_eq!(
            labelled.replace("ERR", "error"),
            v.format(),
        );
    }

    #[test]
    fn exit_code_ors_severity_bits() {
        let mut result = LintResult::new();
        assert_eq!(result.exit_code(), 0);

        result.violations.push(make_violation(Severity::Warning));
        assert_eq!(result.exit_code(), 4);

        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Error));
        assert_eq!(result.exit_code(), 6);
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn report_summarizes_counts() {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(make_violation(Severity::Error));
        let report = result.format_report();
        assert!(report.contains("Found 1 error(s), 0 warning(s), 0 info(s) in 2 template(s)"));
    }

    #[test]
    fn diagnostic_carries_code_and_location() {
        let v = make_violation(Severity::Error);
        let diag = ViolationDiagnostic::from(&v);
        assert_eq!(
            diag.to_string(),
            "[E2503] Protocol is invalid for Resources/Listener/Properties"
        );
    }
}
