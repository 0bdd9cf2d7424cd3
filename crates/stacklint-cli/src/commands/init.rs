//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# stacklint configuration

# Preset to run when --rules is not given: "recommended" or "all"
preset = "recommended"

# Rule ids disabled for every template
ignore_checks = []

[analyzer]
# Glob patterns selecting template files under the checked directories
templates = ["**/*.yaml", "**/*.yml", "**/*.json", "**/*.template"]

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/cdk.out/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations, keyed by rule id.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.E2503]
enabled = true
# severity = "warning"  # Override default severity
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("stacklint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created stacklint.toml");
    println!("\nNext steps:");
    println!("  1. Edit stacklint.toml to configure rules");
    println!("  2. Run: stacklint check");

    Ok(())
}
