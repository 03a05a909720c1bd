//! Rewrites `qt.Assert(t, len(x), qt.Equals, n)` to use `qt.HasLen`.

use super::helpers::{library_checker, AssertionCall};
use crate::core::{Diagnostic, RuleId, SuggestedFix, TextEdit};
use crate::go::nodes::call_args;
use crate::go::render::render;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;

pub fn check(unit: &SourceUnit, types: &UnitTypes, site: &AssertionCall) -> Option<Diagnostic> {
    let observed = site.observed;
    if observed.kind() != "call_expression" {
        return None;
    }
    let fun = observed.child_by_field_name("function")?;
    if fun.kind() != "identifier" || unit.text(fun) != "len" {
        return None;
    }
    // a local declaration may shadow the builtin
    if types.lookup("len", fun.start_byte()).is_some() {
        return None;
    }
    let (args, spread) = call_args(observed)?;
    if args.len() != 1 || spread {
        return None;
    }
    let (alias, checker_name) = library_checker(unit, types, site.checker)?;
    if checker_name != "Equals" {
        return None;
    }
    let value = render(unit, args[0])?;

    let mut span = unit.span(observed);
    span.end = site.checker.end_byte();
    let fix = SuggestedFix::new(
        "Replace with qt.HasLen",
        vec![
            TextEdit::replace(observed.start_byte(), observed.end_byte(), value),
            TextEdit::replace(
                site.checker.start_byte(),
                site.checker.end_byte(),
                format!("{alias}.HasLen"),
            ),
        ],
    );
    Some(
        Diagnostic::new(
            RuleId::HasLen,
            unit.path().to_path_buf(),
            span,
            "qtlint: use qt.HasLen instead of len(x), qt.Equals",
        )
        .with_fix(fix),
    )
}
