//! Expression rendering for suggested fixes.
//!
//! Rewrites splice user expressions back into the file, so rendering
//! reproduces the expression exactly as written rather than reformatting
//! it. Rendering is best-effort: anything syntactically damaged renders as
//! `None` and the caller abstains from offering a fix.

use crate::go::SourceUnit;
use tree_sitter::Node;

/// Source text of an expression or statement for use in a rewrite.
///
/// Returns `None` when the node is missing or contains recovered syntax
/// errors; a fix built from damaged text would corrupt the file.
pub fn render(unit: &SourceUnit, node: Node) -> Option<String> {
    if node.is_missing() || node.has_error() {
        return None;
    }
    let text = unit.text(node);
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::nodes::preorder;
    use crate::go::GoParser;

    #[test]
    fn renders_expression_verbatim() {
        let unit = GoParser::new()
            .unwrap()
            .parse("test.go", "package main\n\nfunc f() { _ = a.B(c[0]) }\n")
            .unwrap();
        let mut rendered = None;
        preorder(unit.root(), &mut |n| {
            if rendered.is_none() && n.kind() == "call_expression" {
                rendered = render(&unit, n);
            }
        });
        assert_eq!(rendered.as_deref(), Some("a.B(c[0])"));
    }

    #[test]
    fn refuses_nodes_with_recovered_errors() {
        let unit = GoParser::new()
            .unwrap()
            .parse("test.go", "package main\n\nfunc f() { _ = a.B(c[ }\n")
            .unwrap();
        let mut attempted = Vec::new();
        preorder(unit.root(), &mut |n| {
            if n.kind() == "call_expression" {
                attempted.push(render(&unit, n));
            }
        });
        assert!(attempted.iter().all(Option::is_none));
    }
}
