//! Structural helpers over tree-sitter Go nodes.
//!
//! Matchers work directly on the concrete syntax tree, so everything here
//! is about picking apart node shapes without tripping over comments or
//! grammar-version differences.

use crate::go::SourceUnit;
use tree_sitter::Node;

/// Named children of a node with comments filtered out. Comments are named
/// nodes in the Go grammar and would otherwise throw off positional
/// argument and statement counts.
pub fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Visit `root` and every descendant in document order.
pub fn preorder<'t, F: FnMut(Node<'t>)>(root: Node<'t>, f: &mut F) {
    let mut cursor = root.walk();
    'walk: loop {
        f(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.node().id() == root.id() {
                break 'walk;
            }
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
}

/// Remove any number of wrapping parentheses around an expression.
pub fn strip_parens(node: Node) -> Node {
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

pub fn is_nil(node: Node) -> bool {
    strip_parens(node).kind() == "nil"
}

/// Operand and field of a selector expression such as `qt.IsNil`.
pub fn selector_parts(node: Node) -> Option<(Node, Node)> {
    if node.kind() != "selector_expression" {
        return None;
    }
    let operand = node.child_by_field_name("operand")?;
    let field = node.child_by_field_name("field")?;
    Some((operand, field))
}

/// Left operand, operator token, and right operand of a binary expression.
pub fn binary_parts(node: Node) -> Option<(Node, &'static str, Node)> {
    if node.kind() != "binary_expression" {
        return None;
    }
    let left = node.child_by_field_name("left")?;
    let op = node.child_by_field_name("operator")?;
    let right = node.child_by_field_name("right")?;
    let op_text = match op.kind() {
        "==" => "==",
        "!=" => "!=",
        _ => return None,
    };
    Some((left, op_text, right))
}

/// Arguments of a call expression plus whether the final argument is
/// spread with `...`. Depending on grammar version the spread shows up
/// either as a `variadic_argument` node or as a bare token in the list,
/// so both shapes are recognized.
pub fn call_args(call: Node) -> Option<(Vec<Node>, bool)> {
    let list = call.child_by_field_name("arguments")?;
    let args = named_children(list);
    let mut spread = args.iter().any(|a| a.kind() == "variadic_argument");
    if !spread {
        let mut cursor = list.walk();
        spread = list
            .children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == "...");
    }
    Some((args, spread))
}

/// The expression under a spread argument, or the node itself for plain
/// arguments.
pub fn spread_inner(arg: Node) -> Node {
    if arg.kind() == "variadic_argument" {
        named_children(arg).into_iter().next().unwrap_or(arg)
    } else {
        arg
    }
}

/// Argument text for re-emission in a rewrite, with the `...` spread
/// restored when the grammar kept it outside the argument node.
pub fn spread_text(unit: &SourceUnit, arg: Node) -> String {
    let text = unit.text(arg);
    if text.ends_with("...") {
        text.to_string()
    } else {
        format!("{text}...")
    }
}

/// Unquoted value of a string literal node. Both interpreted and raw
/// literals delimit with a single character on each side.
pub fn string_literal_value<'s>(unit: &'s SourceUnit, node: Node) -> Option<&'s str> {
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" => {
            let text = unit.text(node);
            if text.len() >= 2 {
                Some(&text[1..text.len() - 1])
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The file's `package` clause node.
pub fn package_clause(root: Node) -> Option<Node> {
    named_children(root)
        .into_iter()
        .find(|n| n.kind() == "package_clause")
}

/// All `import_spec` nodes in file order, flattened across single and
/// grouped import declarations.
pub fn import_specs(root: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    for decl in named_children(root) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        for child in named_children(decl) {
            match child.kind() {
                "import_spec" => specs.push(child),
                "import_spec_list" => {
                    specs.extend(
                        named_children(child)
                            .into_iter()
                            .filter(|n| n.kind() == "import_spec"),
                    );
                }
                _ => {}
            }
        }
    }
    specs
}

/// First grouped import block in the file, if any.
pub fn grouped_import_block(root: Node) -> Option<Node> {
    for decl in named_children(root) {
        if decl.kind() != "import_declaration" {
            continue;
        }
        if let Some(list) = named_children(decl)
            .into_iter()
            .find(|n| n.kind() == "import_spec_list")
        {
            return Some(list);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::GoParser;
    use indoc::indoc;

    fn parse(source: &str) -> SourceUnit {
        GoParser::new().unwrap().parse("test.go", source).unwrap()
    }

    fn find_first<'t>(unit: &'t SourceUnit, kind: &str) -> Option<Node<'t>> {
        let mut found = None;
        preorder(unit.root(), &mut |n| {
            if found.is_none() && n.kind() == kind {
                found = Some(n);
            }
        });
        found
    }

    #[test]
    fn preorder_visits_every_node_once() {
        let unit = parse("package main\n\nfunc f() { g(1, 2) }\n");
        let mut total = 0usize;
        let mut calls = 0usize;
        preorder(unit.root(), &mut |n| {
            total += 1;
            if n.kind() == "call_expression" {
                calls += 1;
            }
        });
        assert!(total > 10);
        assert_eq!(calls, 1);
    }

    #[test]
    fn strips_nested_parens() {
        let unit = parse("package main\n\nfunc f() { _ = ((x != nil)) }\n");
        let parens = find_first(&unit, "parenthesized_expression").unwrap();
        let inner = strip_parens(parens);
        assert_eq!(inner.kind(), "binary_expression");
    }

    #[test]
    fn binary_parts_accepts_only_equality() {
        let unit = parse("package main\n\nfunc f() { _ = a == b; _ = a < b }\n");
        let mut ops = Vec::new();
        preorder(unit.root(), &mut |n| {
            if n.kind() == "binary_expression" {
                ops.push(binary_parts(n).map(|(_, op, _)| op));
            }
        });
        assert_eq!(ops, vec![Some("=="), None]);
    }

    #[test]
    fn call_args_detects_spread() {
        let unit = parse("package main\n\nfunc f() { g(a, b); h(args...) }\n");
        let mut results = Vec::new();
        preorder(unit.root(), &mut |n| {
            if n.kind() == "call_expression" {
                let (args, spread) = call_args(n).unwrap();
                results.push((args.len(), spread));
            }
        });
        assert_eq!(results, vec![(2, false), (1, true)]);
    }

    #[test]
    fn spread_text_keeps_ellipsis() {
        let unit = parse("package main\n\nfunc f() { h(args...) }\n");
        let call = find_first(&unit, "call_expression").unwrap();
        let (args, spread) = call_args(call).unwrap();
        assert!(spread);
        assert_eq!(spread_text(&unit, args[0]), "args...");
    }

    #[test]
    fn collects_import_specs_across_decl_styles() {
        let source = indoc! {r#"
            package main

            import "fmt"

            import (
                "os"
                qt "github.com/frankban/quicktest"
            )
        "#};
        let unit = parse(source);
        let specs = import_specs(unit.root());
        let paths: Vec<&str> = specs
            .iter()
            .filter_map(|s| s.child_by_field_name("path"))
            .filter_map(|p| string_literal_value(&unit, p))
            .collect();
        assert_eq!(paths, vec!["fmt", "os", "github.com/frankban/quicktest"]);
        assert!(grouped_import_block(unit.root()).is_some());
    }

    #[test]
    fn selector_parts_splits_qualifier_and_field() {
        let unit = parse("package main\n\nfunc f() { qt.IsNil() }\n");
        let sel = find_first(&unit, "selector_expression").unwrap();
        let (operand, field) = selector_parts(sel).unwrap();
        assert_eq!(unit.text(operand), "qt");
        assert_eq!(unit.text(field), "IsNil");
    }
}
