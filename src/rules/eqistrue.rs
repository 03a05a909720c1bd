//! Rewrites equality comparisons asserted through boolean checkers.
//!
//! `qt.Assert(t, x == y, qt.IsTrue)` loses the values in the failure
//! report; `qt.Assert(t, x, qt.Equals, y)` keeps them. Disagreeing
//! combinations rewrite to `qt.Not(qt.Equals)`. Comparisons against nil
//! belong to the nil-comparison rule and are skipped here.

use super::helpers::{library_checker, AssertionCall};
use crate::core::{Diagnostic, RuleId, SuggestedFix, TextEdit};
use crate::go::nodes::{binary_parts, is_nil};
use crate::go::render::render;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;

pub fn check(unit: &SourceUnit, types: &UnitTypes, site: &AssertionCall) -> Option<Diagnostic> {
    let cmp = site.observed;
    let (left, op, right) = binary_parts(cmp)?;
    if is_nil(left) || is_nil(right) {
        return None;
    }
    let (alias, checker_name) = library_checker(unit, types, site.checker)?;
    if checker_name != "IsTrue" && checker_name != "IsFalse" {
        return None;
    }
    let positive = (op == "==") == (checker_name == "IsTrue");
    let got = render(unit, left)?;
    let want = render(unit, right)?;

    let (message, checker_text, description) = if positive {
        (
            format!("qtlint: use qt.Equals instead of x {op} y, qt.{checker_name}"),
            format!("{alias}.Equals, {want}"),
            "Replace with qt.Equals".to_string(),
        )
    } else {
        (
            format!("qtlint: use qt.Not(qt.Equals) instead of x {op} y, qt.{checker_name}"),
            format!("{alias}.Not({alias}.Equals), {want}"),
            "Replace with qt.Not(qt.Equals)".to_string(),
        )
    };
    let mut span = unit.span(cmp);
    span.end = site.checker.end_byte();
    let fix = SuggestedFix::new(
        description,
        vec![
            TextEdit::replace(cmp.start_byte(), cmp.end_byte(), got),
            TextEdit::replace(
                site.checker.start_byte(),
                site.checker.end_byte(),
                checker_text,
            ),
        ],
    );
    Some(
        Diagnostic::new(RuleId::EqIsTrue, unit.path().to_path_buf(), span, message).with_fix(fix),
    )
}
