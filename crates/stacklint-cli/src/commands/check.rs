//! Check command implementation.

use anyhow::{bail, Context, Result};
use stacklint_core::{Analyzer, Config, RuleBox};
use stacklint_rules::{recommended_rules, rule_by_id, Preset};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command and returns the process exit code.
pub fn run(
    paths: &[PathBuf],
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<i32> {
    let config = match source {
        ConfigSource::Default => Config::default(),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let rules_to_add = if let Some(filter) = rules_filter {
        let ids: Vec<&str> = filter.split(',').map(str::trim).collect();
        filter_rules(&ids)
    } else if let Some(name) = config.preset.as_deref() {
        match Preset::from_name(name) {
            Some(preset) => preset.rules(),
            None => bail!("Unknown preset in config: {name}"),
        }
    } else {
        recommended_rules()
    };

    let mut builder = Analyzer::builder().config(config);
    for path in paths {
        builder = builder.path(path);
    }
    for pattern in exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules_to_add {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", paths, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    Ok(result.exit_code())
}

fn filter_rules(ids: &[&str]) -> Vec<RuleBox> {
    let mut rules = Vec::new();

    for id in ids {
        match rule_by_id(id) {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", id),
        }
    }

    rules
}
