//! End-to-end lint runs over realistic Go test files.

use qtlint::core::RuleId;
use qtlint::{lint_unit, Diagnostic, GoParser, LintOptions};

fn lint(source: &str) -> Vec<Diagnostic> {
    lint_with(source, &LintOptions::default())
}

fn lint_with(source: &str, options: &LintOptions) -> Vec<Diagnostic> {
    let unit = GoParser::new()
        .unwrap()
        .parse("demo_test.go", source)
        .unwrap();
    lint_unit(&unit, options)
}

#[test]
fn mixed_file_reports_every_rule_in_document_order() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func do() error {
	return nil
}

func TestRewrites(t *testing.T) {
	c := qt.New(t)
	var x *int
	qt.Assert(t, x, qt.Not(qt.IsNil))
	c.Assert(x, qt.Not(qt.IsNil))

	value := false
	qt.Assert(t, value, qt.Not(qt.IsTrue))
	c.Check(value, qt.Not(qt.IsFalse))

	series := []int{1, 2, 3}
	c.Assert(len(series), qt.Equals, 3)

	err := do()
	c.Assert(err == nil, qt.IsTrue)

	got, want := 1, 2
	qt.Assert(t, got == want, qt.IsTrue)
}
"#;
    let diags = lint(source);
    let rules: Vec<RuleId> = diags.iter().map(|d| d.rule).collect();
    assert_eq!(
        rules,
        vec![
            RuleId::Negation,
            RuleId::Negation,
            RuleId::Negation,
            RuleId::Negation,
            RuleId::HasLen,
            RuleId::NilCmp,
            RuleId::EqIsTrue,
        ]
    );

    let lines: Vec<usize> = diags.iter().map(|d| d.span.line).collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);

    assert!(diags.iter().all(|d| d.is_fixable()));
}

#[test]
fn package_qualified_and_receiver_forms_match_equally() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func TestForms(t *testing.T) {
	c := qt.New(t)
	var x *int
	qt.Assert(t, x, qt.Not(qt.IsNil))
	qt.Check(t, x, qt.Not(qt.IsNil))
	c.Assert(x, qt.Not(qt.IsNil))
	c.Check(x, qt.Not(qt.IsNil))
}
"#;
    let diags = lint(source);
    assert_eq!(diags.len(), 4);
    for d in &diags {
        assert_eq!(
            d.message,
            "qtlint: use qt.IsNotNil instead of qt.Not(qt.IsNil)"
        );
    }
}

#[test]
fn renamed_import_keeps_canonical_message_but_real_alias_in_fix() {
    let source = r#"package demo

import (
	"testing"

	quick "github.com/frankban/quicktest"
)

func TestRenamed(t *testing.T) {
	c := quick.New(t)
	var v *int
	c.Assert(v, quick.Not(quick.IsNil))
}
"#;
    let diags = lint(source);
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "qtlint: use qt.IsNotNil instead of qt.Not(qt.IsNil)"
    );
    assert_eq!(diags[0].fixes[0].edits[0].new_text, "quick.IsNotNil");
}

#[test]
fn subtest_closures_are_visited() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func TestSubtests(t *testing.T) {
	c := qt.New(t)
	c.Run("inner", func(c *qt.C) {
		var buf *int
		c.Assert(buf == nil, qt.IsTrue)
	})
}
"#;
    let diags = lint(source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::NilCmp);
    assert_eq!(
        diags[0].message,
        "qtlint: use qt.IsNil instead of x == nil, qt.IsTrue"
    );
}

#[test]
fn field_access_nil_comparison_matches_without_type_info() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func TestDialer(t *testing.T) {
	c := qt.New(t)
	var r Remote
	c.Assert(r.Dial == nil, qt.IsFalse)
}
"#;
    let diags = lint(source);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, RuleId::NilCmp);
    // the fix names the real expression even though the message does not
    assert_eq!(diags[0].fixes[0].edits[0].new_text, "r.Dial");
    assert_eq!(diags[0].fixes[0].edits[1].new_text, "qt.IsNotNil");
}

#[test]
fn custom_library_path_redirects_matching() {
    let fork = r#"package demo

import (
	"testing"

	qt "example.com/fork/quicktest"
)

func TestFork(t *testing.T) {
	c := qt.New(t)
	var x *int
	c.Assert(x, qt.Not(qt.IsNil))
}
"#;
    let options = LintOptions {
        library_path: "example.com/fork/quicktest".to_string(),
        ..LintOptions::default()
    };
    assert_eq!(lint_with(fork, &options).len(), 1);
    // under the fork option the upstream import no longer matches
    let upstream = fork.replace("example.com/fork/quicktest", "github.com/frankban/quicktest");
    assert!(lint_with(&upstream, &options).is_empty());
}

#[test]
fn idiomatic_file_is_clean() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func TestClean(t *testing.T) {
	c := qt.New(t)
	var x *int
	c.Assert(x, qt.IsNil)
	c.Assert([]int{1}, qt.HasLen, 1)
	c.Assert(1+1, qt.Equals, 2)
	c.Assert(true, qt.IsTrue)
}
"#;
    assert!(lint(source).is_empty());
}

#[test]
fn file_without_the_library_is_skipped_entirely() {
    let source = r#"package demo

import "testing"

func TestPlain(t *testing.T) {
	if len("abc") == 3 {
		t.Log("fine")
	}
}
"#;
    assert!(lint(source).is_empty());
}

#[test]
fn results_serialize_with_lowercase_rule_names() {
    let source = r#"package demo

import (
	"testing"

	qt "github.com/frankban/quicktest"
)

func TestOne(t *testing.T) {
	c := qt.New(t)
	var x *int
	c.Assert(x, qt.Not(qt.IsNil))
}
"#;
    let results = qtlint::LintResults::new(1, lint(source));

    let value = serde_json::to_value(&results).unwrap();
    assert_eq!(value["files_scanned"], 1);
    assert_eq!(value["diagnostics"][0]["rule"], "negation");
    assert_eq!(value["diagnostics"][0]["file"], "demo_test.go");
}
