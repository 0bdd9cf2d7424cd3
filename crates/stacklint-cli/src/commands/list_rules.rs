//! List rules command implementation.

use stacklint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<9} {:<28} Tags", "Id", "Severity", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<8} {:<9} {:<28} {}",
            rule.id(),
            rule.severity().to_string(),
            rule.short_description(),
            rule.tags().join(",")
        );
        if !rule.description().is_empty() {
            println!("         {}", rule.description());
        }
        if let Some(url) = rule.source_url() {
            println!("         see: {url}");
        }
    }

    println!("\nPresets:");
    println!("  recommended  - E2503 (default)");
    println!("  all          - every built-in rule");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  stacklint check --rules E2503 templates/");
}
