//! Applies suggested fixes to source text.

use crate::core::errors::{Error, Result};
use crate::core::{Diagnostic, TextEdit};
use std::path::Path;

/// Splice a set of edits into `source`. Edits are applied in offset
/// order; overlapping or out-of-bounds edits fail the whole application
/// rather than produce silently corrupted output.
pub fn apply_edits(path: &Path, source: &str, edits: &[TextEdit]) -> Result<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;
    for edit in sorted {
        if edit.start > edit.end || edit.end > source.len() {
            return Err(Error::fix(
                path,
                format!("edit range {}..{} out of bounds", edit.start, edit.end),
            ));
        }
        if edit.start < pos {
            return Err(Error::fix(
                path,
                format!("overlapping edit at byte {}", edit.start),
            ));
        }
        if !source.is_char_boundary(edit.start) || !source.is_char_boundary(edit.end) {
            return Err(Error::fix(
                path,
                format!("edit range {}..{} splits a character", edit.start, edit.end),
            ));
        }
        out.push_str(&source[pos..edit.start]);
        out.push_str(&edit.new_text);
        pos = edit.end;
    }
    out.push_str(&source[pos..]);
    Ok(out)
}

/// Apply the first suggested fix of each diagnostic, in diagnostic
/// order, skipping any fix whose edits overlap an already-accepted edit.
/// Returns the rewritten text and the number of fixes applied.
pub fn apply_fixes(
    path: &Path,
    source: &str,
    diagnostics: &[Diagnostic],
) -> Result<(String, usize)> {
    let mut accepted: Vec<TextEdit> = Vec::new();
    let mut applied = 0usize;
    for diagnostic in diagnostics {
        let Some(fix) = diagnostic.fixes.first() else {
            continue;
        };
        let collides = fix
            .edits
            .iter()
            .any(|e| accepted.iter().any(|a| a.overlaps(e)));
        if collides {
            log::debug!(
                "skipping overlapping fix in {}: {}",
                path.display(),
                fix.description
            );
            continue;
        }
        accepted.extend(fix.edits.iter().cloned());
        applied += 1;
    }
    if applied == 0 {
        return Ok((source.to_string(), 0));
    }
    let text = apply_edits(path, source, &accepted)?;
    Ok((text, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RuleId, Span, SuggestedFix};
    use std::path::PathBuf;

    fn diag(fixes: Vec<SuggestedFix>) -> Diagnostic {
        let mut d = Diagnostic::new(
            RuleId::Negation,
            PathBuf::from("x.go"),
            Span::new(0, 1, 1, 0),
            "m",
        );
        d.fixes = fixes;
        d
    }

    #[test]
    fn applies_edits_in_offset_order() {
        let source = "abc def ghi";
        let edits = vec![
            TextEdit::replace(8, 11, "III"),
            TextEdit::replace(0, 3, "AAA"),
        ];
        let out = apply_edits(Path::new("x.go"), source, &edits).unwrap();
        assert_eq!(out, "AAA def III");
    }

    #[test]
    fn insertion_at_replacement_boundary_is_allowed() {
        let source = "abcdef";
        let edits = vec![TextEdit::insert(3, "-"), TextEdit::replace(3, 6, "XYZ")];
        let out = apply_edits(Path::new("x.go"), source, &edits).unwrap();
        assert_eq!(out, "abc-XYZ");
    }

    #[test]
    fn rejects_overlapping_edits() {
        let source = "abcdef";
        let edits = vec![TextEdit::replace(0, 4, "x"), TextEdit::replace(2, 6, "y")];
        assert!(apply_edits(Path::new("x.go"), source, &edits).is_err());
    }

    #[test]
    fn rejects_out_of_bounds_edits() {
        let edits = vec![TextEdit::replace(0, 10, "x")];
        assert!(apply_edits(Path::new("x.go"), "abc", &edits).is_err());
    }

    #[test]
    fn first_fix_wins_and_overlaps_are_skipped() {
        let source = "one two three";
        let d1 = diag(vec![SuggestedFix::new(
            "first",
            vec![TextEdit::replace(0, 7, "A")],
        )]);
        let d2 = diag(vec![SuggestedFix::new(
            "second",
            vec![TextEdit::replace(4, 13, "B")],
        )]);
        let d3 = diag(vec![SuggestedFix::new(
            "third",
            vec![TextEdit::replace(8, 13, "C")],
        )]);
        let (out, applied) =
            apply_fixes(Path::new("x.go"), source, &[d1, d2, d3]).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(out, "A C");
    }

    #[test]
    fn diagnostics_without_fixes_pass_through() {
        let (out, applied) = apply_fixes(Path::new("x.go"), "abc", &[diag(vec![])]).unwrap();
        assert_eq!(applied, 0);
        assert_eq!(out, "abc");
    }
}
