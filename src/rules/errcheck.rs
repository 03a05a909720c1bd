//! Flags `if err != nil { t.Fatal(err) }` guards inside quicktest-based
//! tests.
//!
//! The diagnostic is always reported; the rewrite is only offered when
//! the errcheck fix is enabled, because folding a guard into an assertion
//! changes which line the failure is reported from.

use super::helpers::AssertKind;
use crate::core::{Diagnostic, RuleId, SuggestedFix, TextEdit};
use crate::go::nodes::{
    binary_parts, call_args, grouped_import_block, import_specs, is_nil, named_children,
    package_clause, selector_parts, spread_inner, spread_text, string_literal_value, strip_parens,
};
use crate::go::render::render;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;
use crate::rules::LintOptions;
use tree_sitter::Node;

fn assertion_kind(method: &str) -> Option<AssertKind> {
    match method {
        "Fatal" | "Fatalf" => Some(AssertKind::Assert),
        "Error" | "Errorf" => Some(AssertKind::Check),
        _ => None,
    }
}

struct Rewrite<'a> {
    err_name: &'a str,
    qt: &'a str,
    ctx: &'a str,
    kind: AssertKind,
    is_format: bool,
}

pub fn check(
    unit: &SourceUnit,
    types: &UnitTypes,
    opts: &LintOptions,
    if_stmt: Node,
) -> Option<Diagnostic> {
    if if_stmt.kind() != "if_statement" {
        return None;
    }
    if if_stmt.child_by_field_name("alternative").is_some() {
        return None;
    }

    let cond = strip_parens(if_stmt.child_by_field_name("condition")?);
    let (left, op, right) = binary_parts(cond)?;
    if op != "!=" {
        return None;
    }
    let err_node = match (is_nil(left), is_nil(right)) {
        (true, false) => strip_parens(right),
        (false, true) => strip_parens(left),
        _ => return None,
    };
    if err_node.kind() != "identifier" || !types.is_error_ident(unit, err_node) {
        return None;
    }
    let err_name = unit.text(err_node);

    let body = if_stmt.child_by_field_name("consequence")?;
    let stmts = named_children(body);
    if stmts.len() != 1 || stmts[0].kind() != "expression_statement" {
        return None;
    }
    let call = named_children(stmts[0]).into_iter().next()?;
    if call.kind() != "call_expression" {
        return None;
    }
    let fun = call.child_by_field_name("function")?;
    let (recv, method) = selector_parts(fun)?;
    let method_name = unit.text(method);
    let kind = assertion_kind(method_name)?;
    if !types.is_testing_receiver(unit, recv) {
        return None;
    }

    let (args, spread) = call_args(call)?;
    // reporting a different error than the guard tests means the two are
    // intentionally distinct
    for arg in &args {
        let inner = spread_inner(*arg);
        if types.is_error_ident(unit, inner) && unit.text(inner) != err_name {
            return None;
        }
    }

    let at = if_stmt.start_byte();
    let qt = types.library_alias(at)?.to_string();
    let ctx = types.context_var(at)?.to_string();
    let recv_text = render(unit, recv)?;
    let kind_name = kind.as_str();

    let message = format!(
        "qtlint: use {ctx}.{kind_name}({err_name}, {qt}.IsNil) instead of {recv_text}.{method_name}"
    );
    let mut diagnostic = Diagnostic::new(
        RuleId::ErrCheck,
        unit.path().to_path_buf(),
        unit.span(if_stmt),
        message,
    );
    if opts.errcheck_fix {
        let rewrite = Rewrite {
            err_name,
            qt: &qt,
            ctx: &ctx,
            kind,
            is_format: method_name.ends_with('f'),
        };
        if let Some(fix) = build_fix(unit, types, if_stmt, &args, spread, &rewrite) {
            diagnostic = diagnostic.with_fix(fix);
        }
    }
    Some(diagnostic)
}

fn build_fix(
    unit: &SourceUnit,
    types: &UnitTypes,
    if_stmt: Node,
    args: &[Node],
    spread: bool,
    rw: &Rewrite,
) -> Option<SuggestedFix> {
    let at = if_stmt.start_byte();
    let (comment, needs_import) = build_comment(unit, types, args, spread, rw, at)?;
    let Rewrite {
        err_name,
        qt,
        ctx,
        kind,
        ..
    } = rw;
    let kind = kind.as_str();
    let assert_stmt = match &comment {
        Some(c) => format!("{ctx}.{kind}({err_name}, {qt}.IsNil, {c})"),
        None => format!("{ctx}.{kind}({err_name}, {qt}.IsNil)"),
    };
    let replacement = match if_stmt.child_by_field_name("initializer") {
        None => assert_stmt.clone(),
        Some(init) => {
            // keep the initializer alive by scoping both statements in an
            // explicit block
            let init_text = render(unit, init)?;
            let base = unit.line_indent(if_stmt.start_byte());
            format!("{{\n{base}\t{init_text}\n{base}\t{assert_stmt}\n{base}}}")
        }
    };
    let mut edits = vec![TextEdit::replace(
        if_stmt.start_byte(),
        if_stmt.end_byte(),
        replacement,
    )];
    let mut description = format!("Replace with {ctx}.{kind}({err_name}, {qt}.IsNil)");
    if needs_import {
        edits.push(fmt_import_edit(unit)?);
        description.push_str(" (adds \"fmt\" import)");
    }
    Some(SuggestedFix::new(description, edits))
}

/// Comment argument reproducing the guard's failure report, or `None`
/// inside the tuple when the report carries nothing beyond the error
/// itself. An outer `None` means no safe rewrite exists.
fn build_comment(
    unit: &SourceUnit,
    types: &UnitTypes,
    args: &[Node],
    spread: bool,
    rw: &Rewrite,
    at: usize,
) -> Option<(Option<String>, bool)> {
    let qt = rw.qt;
    if args.is_empty() {
        return Some((None, false));
    }
    if !rw.is_format {
        if !spread
            && args.len() == 1
            && args[0].kind() == "identifier"
            && unit.text(args[0]) == rw.err_name
        {
            return Some((None, false));
        }
        if spread {
            if args.len() != 1 {
                return None;
            }
            let (fq, needs) = fmt_qualifier(unit, types, at)?;
            let arg = spread_text(unit, args[0]);
            let comment = format!("{qt}.Commentf(\"%v\", {fq}.Sprint({arg}))");
            return Some((Some(comment), needs));
        }
        let rendered: Vec<String> = args
            .iter()
            .map(|a| render(unit, *a))
            .collect::<Option<_>>()?;
        let placeholders = vec!["%v"; rendered.len()].join(" ");
        let comment = format!("{qt}.Commentf(\"{placeholders}\", {})", rendered.join(", "));
        return Some((Some(comment), false));
    }
    if spread {
        if args.len() != 2 {
            return None;
        }
        let format_text = render(unit, args[0])?;
        let (fq, needs) = fmt_qualifier(unit, types, at)?;
        let arg = spread_text(unit, args[1]);
        let comment = format!("{qt}.Commentf(\"%v\", {fq}.Sprintf({format_text}, {arg}))");
        return Some((Some(comment), needs));
    }
    let rendered: Vec<String> = args
        .iter()
        .map(|a| render(unit, *a))
        .collect::<Option<_>>()?;
    Some((Some(format!("{qt}.Commentf({})", rendered.join(", "))), false))
}

/// Alias to reach the `fmt` package with, plus whether an import must be
/// added. Yields nothing when the file imports fmt but a local name
/// shadows the alias at the rewrite site.
fn fmt_qualifier(unit: &SourceUnit, types: &UnitTypes, at: usize) -> Option<(String, bool)> {
    if let Some(alias) = types.fmt_alias(at) {
        return Some((alias.to_string(), false));
    }
    let imported = import_specs(unit.root()).into_iter().any(|spec| {
        spec.child_by_field_name("path")
            .and_then(|p| string_literal_value(unit, p))
            == Some("fmt")
    });
    if imported {
        None
    } else {
        Some(("fmt".to_string(), true))
    }
}

/// Insertion point for a `"fmt"` import: path-sorted within the first
/// grouped block, or a standalone declaration right after the package
/// clause.
fn fmt_import_edit(unit: &SourceUnit) -> Option<TextEdit> {
    if let Some(block) = grouped_import_block(unit.root()) {
        let specs: Vec<Node> = named_children(block)
            .into_iter()
            .filter(|n| n.kind() == "import_spec")
            .collect();
        for spec in &specs {
            let Some(path) = spec
                .child_by_field_name("path")
                .and_then(|p| string_literal_value(unit, p))
            else {
                continue;
            };
            if path > "fmt" {
                let line_start = unit.line_start(spec.start_byte());
                let indent = unit.line_indent(spec.start_byte());
                return Some(TextEdit::insert(line_start, format!("{indent}\"fmt\"\n")));
            }
        }
        let indent = specs
            .last()
            .map(|s| unit.line_indent(s.start_byte()).to_string())
            .unwrap_or_else(|| "\t".to_string());
        let close_line = unit.line_start(block.end_byte().saturating_sub(1));
        return Some(TextEdit::insert(close_line, format!("{indent}\"fmt\"\n")));
    }
    let pkg = package_clause(unit.root())?;
    Some(TextEdit::insert(
        pkg.end_byte(),
        "\n\nimport \"fmt\"".to_string(),
    ))
}
