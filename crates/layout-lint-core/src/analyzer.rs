//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::fix::apply_edits;
use crate::language::HostBox;
use crate::rule::{Dispatcher, Rule, RuleBox};
use crate::types::{LintResult, TextEdit, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Error walking the directory tree.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// No language host was registered.
    #[error("No language host configured")]
    MissingHost,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    host: Option<HostBox>,
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

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the language host that parses files.
    #[must_use]
    pub fn host<H: crate::LanguageHost + 'static>(mut self, host: H) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Adds a per-node rule to the analyzer.
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

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// Rules disabled in the configuration are dropped here.
    ///
    /// # Errors
    ///
    /// Returns an error if no host was set or the current directory is unavailable.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let host = self.host.ok_or(AnalyzerError::MissingHost)?;
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.clone());

        let rules: Vec<RuleBox> = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        Ok(Analyzer {
            root,
            host,
            rules,
            exclude_patterns,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Source text after autocorrection.
#[derive(Debug, Clone)]
pub struct FixedSource {
    /// Corrected content.
    pub content: String,
    /// Whether any edit was applied.
    pub changed: bool,
    /// Violations still present in the corrected content.
    pub remaining: Vec<Violation>,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    host: HostBox,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of active rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self.rules.iter().map(|rule| -> &dyn Rule { rule.as_ref() }))
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        self.run(false)
    }

    /// Analyzes all files, rewriting those with fixable violations.
    ///
    /// The returned result holds the violations that remain after fixing.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`], plus write failures.
    pub fn fix(&self) -> Result<LintResult, AnalyzerError> {
        self.run(true)
    }

    fn run(&self, fix: bool) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;
        let dispatcher = self.dispatcher();

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let content = std::fs::read_to_string(file_path)?;
            let outcome = if fix {
                self.fix_with(&dispatcher, file_path, &content).map(|fixed| {
                    let rewritten = fixed.changed.then_some(fixed.content);
                    (fixed.remaining, rewritten)
                })
            } else {
                self.check_with(&dispatcher, file_path, &content)
                    .map(|violations| (violations, None))
            };

            match outcome {
                Ok((violations, rewritten)) => {
                    if let Some(new_content) = rewritten {
                        std::fs::write(file_path, new_content)?;
                        info!("Fixed {}", file_path.display());
                        result.files_fixed += 1;
                    }
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a source buffer as if it were the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the host rejects the source.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        self.check_with(&self.dispatcher(), path, content)
    }

    /// Autocorrects a source buffer without touching the filesystem.
    ///
    /// Runs check and fix passes until no fixable violation remains or the
    /// configured pass limit is reached.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the host rejects the source.
    pub fn fix_source(&self, path: &Path, content: &str) -> Result<FixedSource, AnalyzerError> {
        self.fix_with(&self.dispatcher(), path, content)
    }

    fn check_with(
        &self,
        dispatcher: &Dispatcher<'_>,
        path: &Path,
        content: &str,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let tree = self.host.parse(content).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ctx = FileContext::new(path, content, &self.root, self.host.markers());
        let mut violations = Vec::new();
        for (rule_name, found) in dispatcher.run(&ctx, &tree) {
            violations.extend(self.apply_severity_override(rule_name, found));
        }
        Ok(violations)
    }

    fn fix_with(
        &self,
        dispatcher: &Dispatcher<'_>,
        path: &Path,
        content: &str,
    ) -> Result<FixedSource, AnalyzerError> {
        let mut current = content.to_string();

        for pass in 1..=self.config.analyzer.max_fix_passes {
            let violations = self.check_with(dispatcher, path, &current)?;
            let edits: Vec<TextEdit> = violations
                .iter()
                .flat_map(|v| v.edits().iter().cloned())
                .collect();
            if edits.is_empty() {
                break;
            }

            let outcome = apply_edits(&current, &edits);
            debug!(
                "Fix pass {} on {}: {} applied, {} deferred",
                pass,
                path.display(),
                outcome.applied,
                outcome.skipped
            );
            if !outcome.changed() {
                break;
            }
            current = outcome.content;
        }

        let remaining = self.check_with(dispatcher, path, &current)?;
        Ok(FixedSource {
            changed: current != content,
            content: current,
            remaining,
        })
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all source files the host handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .filter_entry(|entry| entry.file_name() != ".git");

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.host.handles(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/vendor/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}
