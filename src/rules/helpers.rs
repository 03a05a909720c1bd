//! Shared recognition of assertion call sites.

use crate::go::nodes::{call_args, selector_parts};
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;
use tree_sitter::Node;

/// Which assertion entry point a call goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssertKind {
    Assert,
    Check,
}

impl AssertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertKind::Assert => "Assert",
            AssertKind::Check => "Check",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Assert" => Some(AssertKind::Assert),
            "Check" => Some(AssertKind::Check),
            _ => None,
        }
    }
}

/// An assertion call with its observed value and checker arguments
/// located.
pub struct AssertionCall<'t> {
    pub call: Node<'t>,
    pub kind: AssertKind,
    pub observed: Node<'t>,
    pub checker: Node<'t>,
}

/// Recognize the two assertion shapes:
///
/// - package-qualified: `qt.Assert(t, observed, checker, ...)`
/// - method on a checker context: `c.Assert(observed, checker, ...)`
///
/// Anything else, including calls with too few arguments to carry both an
/// observed value and a checker, is not an assertion site.
pub fn assertion_call<'t>(
    unit: &SourceUnit,
    types: &UnitTypes,
    call: Node<'t>,
) -> Option<AssertionCall<'t>> {
    if call.kind() != "call_expression" {
        return None;
    }
    let fun = call.child_by_field_name("function")?;
    let (operand, field) = selector_parts(fun)?;
    let kind = AssertKind::from_name(unit.text(field))?;
    let (args, _) = call_args(call)?;
    if types.library_selector(unit, fun).is_some() {
        if args.len() < 3 {
            return None;
        }
        Some(AssertionCall {
            call,
            kind,
            observed: args[1],
            checker: args[2],
        })
    } else if types.is_checker_context(unit, operand) {
        if args.len() < 2 {
            return None;
        }
        Some(AssertionCall {
            call,
            kind,
            observed: args[0],
            checker: args[1],
        })
    } else {
        None
    }
}

/// Alias and checker name of a checker argument that is a selector into
/// the assertion library, as owned strings ready for formatting.
pub fn library_checker(
    unit: &SourceUnit,
    types: &UnitTypes,
    checker: Node,
) -> Option<(String, String)> {
    let (alias, name) = types.library_selector(unit, checker)?;
    Some((unit.text(alias).to_string(), unit.text(name).to_string()))
}
