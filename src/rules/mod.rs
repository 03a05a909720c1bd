//! Pattern matchers and the per-file lint driver.

pub mod eqistrue;
pub mod errcheck;
pub mod haslen;
pub mod helpers;
pub mod negation;
pub mod nilcmp;

use crate::core::Diagnostic;
use crate::go::nodes::preorder;
use crate::go::SourceUnit;
use crate::resolve::UnitTypes;

/// Default import path of the assertion library.
pub const DEFAULT_LIBRARY_PATH: &str = "github.com/frankban/quicktest";

/// Knobs for a lint run.
#[derive(Clone, Debug)]
pub struct LintOptions {
    /// Import path checker selectors are matched against.
    pub library_path: String,
    /// Offer machine-applicable rewrites for guarded fatals.
    pub errcheck_fix: bool,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            library_path: DEFAULT_LIBRARY_PATH.to_string(),
            errcheck_fix: false,
        }
    }
}

/// Lint one parsed file.
pub fn lint_unit(unit: &SourceUnit, opts: &LintOptions) -> Vec<Diagnostic> {
    let types = UnitTypes::build(unit, &opts.library_path);
    lint_unit_with(unit, &types, opts)
}

/// Lint one parsed file against a prebuilt symbol table. Diagnostics come
/// back in document order.
pub fn lint_unit_with(
    unit: &SourceUnit,
    types: &UnitTypes,
    opts: &LintOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    preorder(unit.root(), &mut |node| match node.kind() {
        "call_expression" => {
            if let Some(site) = helpers::assertion_call(unit, types, node) {
                if let Some(d) = negation::check(unit, types, &site) {
                    diagnostics.push(d);
                }
                if let Some(d) = haslen::check(unit, types, &site) {
                    diagnostics.push(d);
                }
                // nil comparisons have their own checker pair; the
                // equality rule only sees what the nil rule passed over
                match nilcmp::check(unit, types, &site) {
                    Some(d) => diagnostics.push(d),
                    None => {
                        if let Some(d) = eqistrue::check(unit, types, &site) {
                            diagnostics.push(d);
                        }
                    }
                }
            }
        }
        "if_statement" => {
            if let Some(d) = errcheck::check(unit, types, opts, node) {
                diagnostics.push(d);
            }
        }
        _ => {}
    });
    diagnostics
}
