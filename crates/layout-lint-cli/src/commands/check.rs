//! Check command implementation.

use anyhow::{Context, Result};
use layout_lint_core::Analyzer;
use layout_lint_rules::rules_from_config;
use layout_lint_ruby::RubyHost;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Rewrite files with correctable violations.
    pub fix: bool,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Returns `false` when violations at or above the configured `fail_on`
/// severity remain.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = source.load()?;
    let fail_threshold = config.fail_threshold();
    let rules = rules_from_config(&config).context("Invalid rule configuration")?;

    let mut builder = Analyzer::builder()
        .root(path)
        .host(RubyHost::new())
        .config(config)
        .excludes(options.exclude.iter().cloned());
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = if options.fix {
        analyzer.fix().context("Autocorrection failed")?
    } else {
        analyzer.analyze().context("Analysis failed")?
    };

    super::output::print(&result, options.format, analyzer.root())?;

    Ok(!result.has_violations_at(fail_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MISALIGNED: &str = "def greet\n  a = 1\n   b = 2\nend\n";

    fn options(fix: bool) -> CheckOptions {
        CheckOptions {
            format: OutputFormat::Compact,
            fix,
            exclude: Vec::new(),
        }
    }

    #[test]
    fn warnings_pass_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("greet.rb"), MISALIGNED).unwrap();

        assert!(run(tmp.path(), &options(false), &ConfigSource::Default).unwrap());
    }

    #[test]
    fn fail_on_warning_fails_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("greet.rb"), MISALIGNED).unwrap();
        let config = tmp.path().join("layout-lint.toml");
        fs::write(&config, "fail_on = \"warning\"\n").unwrap();

        let source = ConfigSource::Project(config);
        assert!(!run(tmp.path(), &options(false), &source).unwrap());
    }

    #[test]
    fn fix_rewrites_files() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("greet.rb");
        fs::write(&file, MISALIGNED).unwrap();
        let config = tmp.path().join("layout-lint.toml");
        fs::write(&config, "fail_on = \"warning\"\n").unwrap();

        let source = ConfigSource::Project(config);
        assert!(run(tmp.path(), &options(true), &source).unwrap());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "def greet\n  a = 1\n  b = 2\nend\n"
        );
    }

    #[test]
    fn invalid_style_is_reported() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("layout-lint.toml");
        fs::write(&config, "[rules.indentation-consistency]\nstyle = \"tabs\"\n").unwrap();

        let err = run(tmp.path(), &options(false), &ConfigSource::Project(config)).unwrap_err();
        assert!(format!("{err:#}").contains("tabs"));
    }
}
