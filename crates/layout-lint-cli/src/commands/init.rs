//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# layout-lint configuration

# Severity at or above which `layout-lint check` exits with status 1
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./app"

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/node_modules/**",
    "**/db/schema.rb",
]

# Respect .gitignore files
respect_gitignore = true

# Maximum check/fix rounds per file with --fix
# max_fix_passes = 10

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.indentation-consistency]
enabled = true
# severity = "error"  # Override default severity
# "normal": one column per block
# "sectioned" (or "rails"): private/protected lines start a new section
style = "normal"
"#;

/// File name written by the init command.
pub const CONFIG_FILE: &str = "layout-lint.toml";

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: layout-lint check");
    println!("  3. Run: layout-lint check --fix");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_lint_core::Config;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.is_rule_enabled("indentation-consistency"));
        assert!(layout_lint_rules::rules_from_config(&config).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_config(tmp.path(), false).unwrap();
        assert!(write_config(tmp.path(), false).is_err());
        assert!(write_config(tmp.path(), true).is_ok());
    }
}
