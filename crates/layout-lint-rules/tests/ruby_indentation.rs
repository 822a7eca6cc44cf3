//! End-to-end checks of indentation-consistency on Ruby sources.

use layout_lint_core::{Analyzer, AnalyzerError, Config};
use layout_lint_rules::{rules_from_config, IndentationConsistency, StylePolicy};
use layout_lint_ruby::RubyHost;
use std::path::Path;

fn analyzer(style: StylePolicy) -> Analyzer {
    Analyzer::builder()
        .root(".")
        .host(RubyHost::new())
        .rule(IndentationConsistency::new().style(style))
        .build()
        .expect("Failed to build analyzer")
}

const ACCOUNT: &str = "\
class Account
  def open
  end

  private

    def audit
    end

    def close
    end
end
";

#[test]
fn test_misaligned_statement_in_method_body() {
    let src = "def greet\n  a = 1\n   b = 2\n  puts a + b\nend\n";
    let violations = analyzer(StylePolicy::Normal)
        .analyze_source(Path::new("greet.rb"), src)
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].location.line, 3);
    assert_eq!(violations[0].location.column, 4);
    assert_eq!(violations[0].message, "Inconsistent indentation detected.");

    let fixed = analyzer(StylePolicy::Normal)
        .fix_source(Path::new("greet.rb"), src)
        .unwrap();
    assert_eq!(fixed.content, "def greet\n  a = 1\n  b = 2\n  puts a + b\nend\n");
    assert!(fixed.remaining.is_empty());
}

#[test]
fn test_sectioned_style_accepts_indented_private_section() {
    let violations = analyzer(StylePolicy::Sectioned)
        .analyze_source(Path::new("account.rb"), ACCOUNT)
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_normal_style_flags_indented_private_section() {
    let violations = analyzer(StylePolicy::Normal)
        .analyze_source(Path::new("account.rb"), ACCOUNT)
        .unwrap();
    let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
    assert_eq!(lines, vec![7, 10]);

    let fixed = analyzer(StylePolicy::Normal)
        .fix_source(Path::new("account.rb"), ACCOUNT)
        .unwrap();
    assert_eq!(
        fixed.content,
        "\
class Account
  def open
  end

  private

  def audit
  end

  def close
  end
end
"
    );
    assert!(fixed.remaining.is_empty());
}

#[test]
fn test_sectioned_sections_align_independently() {
    let src = "\
class Account
  def open
  end
   def reopen
   end

  private

    def audit
    end
     def close
     end
end
";
    let violations = analyzer(StylePolicy::Sectioned)
        .analyze_source(Path::new("account.rb"), src)
        .unwrap();
    let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
    assert_eq!(lines, vec![4, 11]);
}

#[test]
fn test_fix_moves_nested_lines_but_not_string_interior() {
    let src = "\
begin
  foo
    if ready
      text = \"line one
  line two\"
      bar
    end
end
";
    let fixed = analyzer(StylePolicy::Normal)
        .fix_source(Path::new("nested.rb"), src)
        .unwrap();
    assert_eq!(
        fixed.content,
        "\
begin
  foo
  if ready
    text = \"line one
  line two\"
    bar
  end
end
"
    );
    assert!(fixed.remaining.is_empty());
}

#[test]
fn test_fix_keeps_embedded_document_at_column_zero() {
    let src = "def f\n    a\n  def g\n=begin\nx\n=end\n    1\n  end\nend\n";
    let fixed = analyzer(StylePolicy::Normal)
        .fix_source(Path::new("doc.rb"), src)
        .unwrap();
    assert_eq!(
        fixed.content,
        "def f\n    a\n    def g\n=begin\nx\n=end\n      1\n    end\nend\n"
    );
    assert!(fixed.remaining.is_empty());
}

#[test]
fn test_modifier_inside_method_body_does_not_split_sections() {
    let src = "def f\n  a\n  private\n    b\nend\n";
    let violations = analyzer(StylePolicy::Sectioned)
        .analyze_source(Path::new("f.rb"), src)
        .unwrap();
    let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
    assert_eq!(lines, vec![4]);
}

#[test]
fn test_semicolon_separated_statements_are_not_indentation() {
    let src = "def run\n  a = 1; b = 2\n  c = 3\nend\n";
    let violations = analyzer(StylePolicy::Normal)
        .analyze_source(Path::new("run.rb"), src)
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_allow_directive_keeps_statement() {
    let src = "\
def table
  a = 1
  # layout-lint: allow(indentation-consistency) reason=\"aligned with header\"
   b = 2
end
";
    let violations = analyzer(StylePolicy::Normal)
        .analyze_source(Path::new("table.rb"), src)
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_config_selects_style() {
    let config = Config::parse("[rules.indentation-consistency]\nstyle = \"rails\"\n").unwrap();
    let mut builder = Analyzer::builder()
        .root(".")
        .host(RubyHost::new())
        .config(config.clone());
    for rule in rules_from_config(&config).unwrap() {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().unwrap();

    let violations = analyzer
        .analyze_source(Path::new("account.rb"), ACCOUNT)
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_invalid_ruby_is_a_parse_error() {
    let err = analyzer(StylePolicy::Normal)
        .analyze_source(Path::new("broken.rb"), "def broken(\n")
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::Parse { .. }));
}

#[test]
fn test_fix_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("greet.rb"), "def greet\n  a\n    b\nend\n").unwrap();
    std::fs::write(tmp.path().join("ok.rb"), "def ok\n  a\n  b\nend\n").unwrap();

    let build = || {
        Analyzer::builder()
            .root(tmp.path())
            .host(RubyHost::new())
            .rule(IndentationConsistency::new())
            .build()
            .unwrap()
    };

    let result = build().analyze().unwrap();
    assert_eq!(result.files_checked, 2);
    assert_eq!(result.fixable_count(), 1);

    let fixed = build().fix().unwrap();
    assert_eq!(fixed.files_fixed, 1);
    assert!(fixed.violations.is_empty());
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("greet.rb")).unwrap(),
        "def greet\n  a\n  b\nend\n"
    );
}
