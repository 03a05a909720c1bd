//! Rewrites nil comparisons asserted through boolean checkers.
//!
//! `qt.Assert(t, x == nil, qt.IsTrue)` and the three sibling shapes all
//! have a direct checker: `qt.IsNil` when the comparison and the checker
//! agree, `qt.IsNotNil` when they disagree.

use super::helpers::{library_checker, AssertionCall};
use crate::core::{Diagnostic, RuleId, SuggestedFix, TextEdit};
use crate::go::nodes::{binary_parts, is_nil};
use crate::go::render::render;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;

pub fn check(unit: &SourceUnit, types: &UnitTypes, site: &AssertionCall) -> Option<Diagnostic> {
    let cmp = site.observed;
    let (left, op, right) = binary_parts(cmp)?;
    let left_nil = is_nil(left);
    let right_nil = is_nil(right);
    if left_nil == right_nil {
        return None;
    }
    let value = if left_nil { right } else { left };
    let (alias, checker_name) = library_checker(unit, types, site.checker)?;
    if checker_name != "IsTrue" && checker_name != "IsFalse" {
        return None;
    }
    let positive = (op == "==") == (checker_name == "IsTrue");
    let replacement = if positive { "IsNil" } else { "IsNotNil" };
    let rendered = render(unit, value)?;

    let message = format!(
        "qtlint: use qt.{replacement} instead of x {op} nil, qt.{checker_name}"
    );
    let mut span = unit.span(cmp);
    span.end = site.checker.end_byte();
    let fix = SuggestedFix::new(
        format!("Replace with qt.{replacement}"),
        vec![
            TextEdit::replace(cmp.start_byte(), cmp.end_byte(), rendered),
            TextEdit::replace(
                site.checker.start_byte(),
                site.checker.end_byte(),
                format!("{alias}.{replacement}"),
            ),
        ],
    );
    Some(
        Diagnostic::new(RuleId::NilCmp, unit.path().to_path_buf(), span, message).with_fix(fix),
    )
}
