//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::loader::{self, LoadError};
use crate::path::DocPath;
use crate::rule::{Rule, RuleBox};
use crate::template::Template;
use crate::types::{Finding, LintResult, Severity, Violation};
use crate::utils::suppression::Suppressions;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rule id used for templates that cannot be parsed.
pub const PARSE_ERROR_CODE: &str = "E0000";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the directory tree.
    #[error("Failed to walk {path}: {message}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Walker error message.
        message: String,
    },

    /// Template could not be loaded.
    #[error("Failed to load {path}: {source}")]
    Load {
        /// Path to the template.
        path: PathBuf,
        /// Loader error.
        source: LoadError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template file or a directory to search for templates.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
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

    /// Sets whether to fail on unparsable templates (default: false, which
    /// reports them as [`PARSE_ERROR_CODE`] violations instead).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob pattern is invalid or the current directory
    /// cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let mut paths = self.paths;
        if paths.is_empty() {
            paths.push(std::env::current_dir()?);
        }

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let templates = compile_patterns(&config.analyzer.templates)?;
        let excludes = compile_patterns(&exclude_patterns)?;

        Ok(Analyzer {
            paths,
            rules: self.rules,
            templates,
            excludes,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, AnalyzerError> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(AnalyzerError::from))
        .collect()
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    templates: Vec<glob::Pattern>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Loads and checks every discovered template.
    ///
    /// Violations are ordered by file; within a file, by rule registration
    /// order, then by the order each rule reported them.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a template cannot be
    /// parsed and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} templates to analyze", files.len());

        for file in &files {
            match loader::load_file(file) {
                Ok(template) => {
                    result.violations.extend(self.analyze_template(&template));
                }
                Err(e @ LoadError::Io { .. }) => {
                    return Err(AnalyzerError::Load {
                        path: file.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", file.display(), e);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Load {
                            path: file.clone(),
                            source: e,
                        });
                    }
                    result.violations.push(parse_error_violation(file, &e));
                }
            }
            result.files_checked += 1;
        }

        info!(
            "Analysis complete: {} violations in {} templates",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Runs every enabled rule over one loaded template.
    ///
    /// Each rule's findings are collected separately and appended in rule
    /// registration order. Findings silenced by template or resource
    /// metadata are dropped.
    #[must_use]
    pub fn analyze_template(&self, template: &Template) -> Vec<Violation> {
        let file = template
            .filename()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        let suppressions = Suppressions::collect(template);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.id()) {
                debug!("Skipping disabled rule: {}", rule.id());
                continue;
            }

            let severity = self
                .config
                .rule_severity(rule.id())
                .unwrap_or_else(|| rule.severity());

            for finding in rule.check(template) {
                let state = suppressions.check(rule.id(), finding.path());
                if state.is_suppressed() {
                    debug!("{} at {} suppressed ({:?})", rule.id(), finding.path(), state);
                    continue;
                }

                let mut violation = Violation::new(
                    rule.id(),
                    rule.short_description(),
                    severity,
                    file.clone(),
                    finding,
                );
                if let Some(url) = rule.source_url() {
                    violation = violation.with_doc_ref(url);
                }
                violations.push(violation);
            }
        }

        violations
    }

    /// Discovers template files under the configured paths, sorted.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for root in &self.paths {
            if root.is_file() {
                // Explicitly named files are always checked.
                files.push(root.clone());
                continue;
            }

            // .gitignore files apply even outside a git checkout.
            let walker = ignore::WalkBuilder::new(root)
                .git_ignore(self.config.analyzer.respect_gitignore)
                .require_git(false)
                .hidden(true)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| AnalyzerError::Walk {
                    path: root.clone(),
                    message: e.to_string(),
                })?;
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }

                let path = entry.path();
                let relative = path.strip_prefix(root).unwrap_or(path);
                if !self.is_template(relative) {
                    continue;
                }
                if self.should_exclude(path) {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn is_template(&self, relative: &Path) -> bool {
        self.templates.iter().any(|p| p.matches_path(relative))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.excludes.iter().any(|pattern| {
            if pattern.matches(&path_str) {
                return true;
            }
            // Also check as substring for patterns like "**/node_modules/**"
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }
}

fn parse_error_violation(file: &Path, error: &LoadError) -> Violation {
    Violation::new(
        PARSE_ERROR_CODE,
        "Template syntax error",
        Severity::Error,
        file.to_path_buf(),
        Finding::new(DocPath::root(), error.to_string()),
    )
}
