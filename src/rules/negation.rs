//! Rewrites `qt.Not(checker)` to the checker's direct opposite.

use super::helpers::AssertionCall;
use crate::core::{Diagnostic, RuleId, SuggestedFix, TextEdit};
use crate::go::nodes::call_args;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;

/// Checkers with a dedicated negated form.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("IsNil", "IsNotNil"),
    ("IsTrue", "IsFalse"),
    ("IsFalse", "IsTrue"),
];

pub fn check(unit: &SourceUnit, types: &UnitTypes, site: &AssertionCall) -> Option<Diagnostic> {
    let not_call = site.checker;
    if not_call.kind() != "call_expression" {
        return None;
    }
    let fun = not_call.child_by_field_name("function")?;
    let (_, not_name) = types.library_selector(unit, fun)?;
    if unit.text(not_name) != "Not" {
        return None;
    }
    let (args, spread) = call_args(not_call)?;
    if args.len() != 1 || spread {
        return None;
    }
    let (alias, inner_name) = types.library_selector(unit, args[0])?;
    let inner_name = unit.text(inner_name);
    let replacement = REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == inner_name)
        .map(|(_, to)| *to)?;
    let alias = unit.text(alias);

    let message = format!("qtlint: use qt.{replacement} instead of qt.Not(qt.{inner_name})");
    let fix = SuggestedFix::new(
        format!("Replace with qt.{replacement}"),
        vec![TextEdit::replace(
            not_call.start_byte(),
            not_call.end_byte(),
            format!("{alias}.{replacement}"),
        )],
    );
    Some(
        Diagnostic::new(
            RuleId::Negation,
            unit.path().to_path_buf(),
            unit.span(not_call),
            message,
        )
        .with_fix(fix),
    )
}
