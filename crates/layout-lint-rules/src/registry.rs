//! Rule catalog and construction from configuration.

use crate::IndentationConsistency;
use layout_lint_core::{Config, ConfigError, RuleBox};

/// Names of every built-in rule.
pub const RULE_NAMES: &[&str] = &[crate::indentation_consistency::NAME];

/// Returns every built-in rule with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(IndentationConsistency::new())]
}

/// Builds the enabled rules, applying each rule's options from `config`.
///
/// # Errors
///
/// Returns an error if a rule section carries an invalid option.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let mut rules: Vec<RuleBox> = Vec::new();

    let name = crate::indentation_consistency::NAME;
    if config.is_rule_enabled(name) {
        let rule = match config.rule(name) {
            Some(section) => IndentationConsistency::from_config(section)?,
            None => IndentationConsistency::new(),
        };
        rules.push(Box::new(rule));
    }

    Ok(rules)
}
