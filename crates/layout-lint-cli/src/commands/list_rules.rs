//! List rules command implementation.

use layout_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<26} {:<8} Description", "Code", "Name", "Fix");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        let fix = if rule.supports_autocorrect() { "yes" } else { "no" };
        println!(
            "{:<10} {:<26} {:<8} {}",
            rule.code(),
            rule.name(),
            fix,
            rule.description()
        );
    }

    println!("\nOptions:");
    println!("  indentation-consistency.style  normal (default) | sectioned (alias: rails)");

    println!("\nConfigure rules in layout-lint.toml, e.g.:");
    println!("  [rules.indentation-consistency]");
    println!("  style = \"sectioned\"");
}
