//! Best-effort single-file symbol resolution.
//!
//! Go tooling normally gets type facts from the compiler. Analysis here is
//! strictly per-file, so a lightweight two-pass scan reconstructs just
//! enough: import aliases, declared names with statically evident types,
//! and the results of a handful of well-known constructors. Anything
//! beyond that resolves to [`GoType::Unknown`], and matchers treat unknown
//! as "not proven", never as a match.

pub mod types;

pub use types::GoType;

use crate::go::nodes::{
    import_specs, named_children, preorder, selector_parts, string_literal_value, strip_parens,
};
use crate::go::SourceUnit;
use std::collections::HashMap;
use std::ops::Range;
use tree_sitter::Node;

const TESTING_PATH: &str = "testing";
const ERRORS_PATH: &str = "errors";
const FMT_PATH: &str = "fmt";

#[derive(Clone, Debug)]
pub enum BindingKind {
    /// An import alias for a package path.
    Import { path: String },
    /// A variable or constant with its resolved type.
    Var { ty: GoType },
    /// A file-level function name.
    Func,
    /// A file-level type name.
    Type,
}

/// One named declaration and the byte range in which it is visible.
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    scope: Range<usize>,
    visible_from: usize,
}

impl Binding {
    fn in_scope(&self, at: usize) -> bool {
        at >= self.scope.start && at < self.scope.end && at >= self.visible_from
    }
}

/// Symbol table for a single parsed file.
///
/// File-scope names are visible throughout the file regardless of
/// declaration order; locals become visible after their declaration and
/// die at the end of the enclosing block. Lookups resolve to the
/// innermost binding in scope, which is what makes shadowing work.
pub struct UnitTypes {
    library_path: String,
    bindings: Vec<Binding>,
    func_results: HashMap<String, Vec<GoType>>,
}

impl UnitTypes {
    pub fn build(unit: &SourceUnit, library_path: &str) -> Self {
        let mut table = UnitTypes {
            library_path: library_path.to_string(),
            bindings: Vec::new(),
            func_results: HashMap::new(),
        };
        table.collect_imports(unit);
        table.collect_file_decls(unit);
        table.collect_file_vars(unit);
        table.collect_locals(unit);
        table
    }

    pub fn library_path(&self) -> &str {
        &self.library_path
    }

    /// Innermost binding for `name` visible at byte offset `at`.
    pub fn lookup(&self, name: &str, at: usize) -> Option<&Binding> {
        self.bindings
            .iter()
            .filter(|b| b.name == name && b.in_scope(at))
            .max_by_key(|b| (b.scope.start, b.visible_from))
    }

    /// Import path behind `name` at `at`, unless the alias is shadowed.
    pub fn import_path_of(&self, name: &str, at: usize) -> Option<&str> {
        match &self.lookup(name, at)?.kind {
            BindingKind::Import { path } => Some(path),
            _ => None,
        }
    }

    /// When `node` is `alias.Field` with `alias` importing the assertion
    /// library, yields the alias and field identifier nodes.
    pub fn library_selector<'t>(
        &self,
        unit: &SourceUnit,
        node: Node<'t>,
    ) -> Option<(Node<'t>, Node<'t>)> {
        let (operand, field) = selector_parts(node)?;
        if operand.kind() != "identifier" {
            return None;
        }
        let path = self.import_path_of(unit.text(operand), operand.start_byte())?;
        if path == self.library_path {
            Some((operand, field))
        } else {
            None
        }
    }

    /// True when `expr` is statically typed as the library's checker
    /// context (`C` or `*C`).
    pub fn is_checker_context(&self, unit: &SourceUnit, expr: Node) -> bool {
        self.type_of_expr(unit, expr)
            .deref()
            .is_named(&self.library_path, "C")
    }

    /// True when `expr` is one of the standard testing receivers:
    /// `*testing.T`, `*testing.B`, `*testing.F`, or `testing.TB`.
    pub fn is_testing_receiver(&self, unit: &SourceUnit, expr: Node) -> bool {
        let ty = self.type_of_expr(unit, expr);
        let base = ty.deref();
        ["T", "B", "F", "TB"]
            .iter()
            .any(|name| base.is_named(TESTING_PATH, name))
    }

    /// True when `node` is an identifier statically typed as the
    /// predeclared `error` interface.
    pub fn is_error_ident(&self, unit: &SourceUnit, node: Node) -> bool {
        if node.kind() != "identifier" {
            return false;
        }
        match self.lookup(unit.text(node), node.start_byte()) {
            Some(Binding {
                kind: BindingKind::Var { ty },
                ..
            }) => ty.is_error(),
            _ => false,
        }
    }

    /// Unshadowed alias for the assertion library visible at `at`.
    pub fn library_alias(&self, at: usize) -> Option<&str> {
        self.accessible_import(&self.library_path, at)
    }

    /// Unshadowed alias for the `fmt` package visible at `at`.
    pub fn fmt_alias(&self, at: usize) -> Option<&str> {
        self.accessible_import(FMT_PATH, at)
    }

    fn accessible_import(&self, path: &str, at: usize) -> Option<&str> {
        self.bindings
            .iter()
            .filter(|b| {
                b.in_scope(at) && matches!(&b.kind, BindingKind::Import { path: p } if p == path)
            })
            .map(|b| b.name.as_str())
            .find(|name| {
                matches!(
                    self.lookup(name, at).map(|b| &b.kind),
                    Some(BindingKind::Import { path: p }) if p == path
                )
            })
    }

    /// Innermost variable of checker-context type visible at `at`.
    pub fn context_var(&self, at: usize) -> Option<&str> {
        self.bindings
            .iter()
            .filter(|b| b.in_scope(at))
            .filter(|b| {
                matches!(
                    &b.kind,
                    BindingKind::Var { ty } if ty.deref().is_named(&self.library_path, "C")
                )
            })
            .filter(|b| {
                // a shadowing binding of another type makes the name unusable
                matches!(
                    self.lookup(&b.name, at).map(|top| &top.kind),
                    Some(BindingKind::Var { ty })
                        if ty.deref().is_named(&self.library_path, "C")
                )
            })
            .max_by_key(|b| (b.scope.start, b.visible_from))
            .map(|b| b.name.as_str())
    }

    /// Static type of an expression, as far as the table can tell.
    pub fn type_of_expr(&self, unit: &SourceUnit, node: Node) -> GoType {
        let node = strip_parens(node);
        match node.kind() {
            "identifier" => match self.lookup(unit.text(node), node.start_byte()) {
                Some(Binding {
                    kind: BindingKind::Var { ty },
                    ..
                }) => ty.clone(),
                _ => GoType::Unknown,
            },
            "unary_expression" => {
                let op = node.child_by_field_name("operator");
                let operand = node.child_by_field_name("operand");
                match (op, operand) {
                    (Some(op), Some(operand)) if op.kind() == "&" => {
                        GoType::pointer(self.type_of_expr(unit, operand))
                    }
                    _ => GoType::Unknown,
                }
            }
            "composite_literal" => node
                .child_by_field_name("type")
                .map(|t| self.parse_type(unit, t))
                .unwrap_or(GoType::Unknown),
            "call_expression" => self.type_of_call(unit, node).unwrap_or(GoType::Unknown),
            _ => GoType::Unknown,
        }
    }

    fn type_of_call(&self, unit: &SourceUnit, call: Node) -> Option<GoType> {
        let fun = call.child_by_field_name("function")?;
        match fun.kind() {
            "identifier" => {
                let name = unit.text(fun);
                match self.lookup(name, fun.start_byte())?.kind {
                    BindingKind::Func => {
                        let results = self.func_results.get(name)?;
                        if results.len() == 1 {
                            Some(results[0].clone())
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            }
            "selector_expression" => {
                let (operand, field) = selector_parts(fun)?;
                if operand.kind() != "identifier" {
                    return None;
                }
                let path = self.import_path_of(unit.text(operand), operand.start_byte())?;
                let func = unit.text(field);
                if path == self.library_path && func == "New" {
                    Some(GoType::pointer(GoType::qualified(&self.library_path, "C")))
                } else if path == ERRORS_PATH && func == "New" {
                    Some(GoType::named("error"))
                } else if path == FMT_PATH && func == "Errorf" {
                    Some(GoType::named("error"))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn parse_type(&self, unit: &SourceUnit, node: Node) -> GoType {
        match node.kind() {
            "type_identifier" => GoType::named(unit.text(node)),
            "qualified_type" => {
                let pkg = node.child_by_field_name("package");
                let name = node.child_by_field_name("name");
                match (pkg, name) {
                    (Some(pkg), Some(name)) => {
                        match self.import_path_of(unit.text(pkg), node.start_byte()) {
                            Some(path) => GoType::qualified(path, unit.text(name)),
                            None => GoType::Unknown,
                        }
                    }
                    _ => GoType::Unknown,
                }
            }
            "pointer_type" | "parenthesized_type" => named_children(node)
                .into_iter()
                .next()
                .map(|inner| match node.kind() {
                    "pointer_type" => GoType::pointer(self.parse_type(unit, inner)),
                    _ => self.parse_type(unit, inner),
                })
                .unwrap_or(GoType::Unknown),
            _ => GoType::Unknown,
        }
    }

    fn push(&mut self, name: &str, kind: BindingKind, scope: Range<usize>, visible_from: usize) {
        if name.is_empty() || name == "_" {
            return;
        }
        self.bindings.push(Binding {
            name: name.to_string(),
            kind,
            scope,
            visible_from,
        });
    }

    fn collect_imports(&mut self, unit: &SourceUnit) {
        for spec in import_specs(unit.root()) {
            let Some(path_node) = spec.child_by_field_name("path") else {
                continue;
            };
            let Some(path) = string_literal_value(unit, path_node) else {
                continue;
            };
            let name = match spec.child_by_field_name("name") {
                Some(n) if n.kind() == "package_identifier" => unit.text(n).to_string(),
                // dot and blank imports introduce no usable qualifier
                Some(_) => continue,
                None => default_package_name(path).to_string(),
            };
            let path = path.to_string();
            self.push(&name, BindingKind::Import { path }, 0..usize::MAX, 0);
        }
    }

    fn collect_file_decls(&mut self, unit: &SourceUnit) {
        for decl in named_children(unit.root()) {
            match decl.kind() {
                "function_declaration" => {
                    let Some(name) = decl.child_by_field_name("name") else {
                        continue;
                    };
                    let name = unit.text(name).to_string();
                    let results = self.parse_result_types(unit, decl);
                    self.push(&name, BindingKind::Func, 0..usize::MAX, 0);
                    self.func_results.insert(name, results);
                }
                "type_declaration" => {
                    let mut specs = Vec::new();
                    preorder(decl, &mut |n| {
                        if n.kind() == "type_spec" || n.kind() == "type_alias" {
                            specs.push(n);
                        }
                    });
                    for spec in specs {
                        if let Some(name) = spec.child_by_field_name("name") {
                            let name = unit.text(name).to_string();
                            self.push(&name, BindingKind::Type, 0..usize::MAX, 0);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_file_vars(&mut self, unit: &SourceUnit) {
        for decl in named_children(unit.root()) {
            if decl.kind() == "var_declaration" || decl.kind() == "const_declaration" {
                self.bind_var_specs(unit, decl, 0..usize::MAX);
            }
        }
    }

    fn parse_result_types(&self, unit: &SourceUnit, func: Node) -> Vec<GoType> {
        let Some(result) = func.child_by_field_name("result") else {
            return Vec::new();
        };
        if result.kind() != "parameter_list" {
            return vec![self.parse_type(unit, result)];
        }
        let mut types = Vec::new();
        for decl in named_children(result) {
            if decl.kind() != "parameter_declaration" {
                continue;
            }
            let ty = decl
                .child_by_field_name("type")
                .map(|t| self.parse_type(unit, t))
                .unwrap_or(GoType::Unknown);
            let mut cursor = decl.walk();
            let names = decl.children_by_field_name("name", &mut cursor).count();
            for _ in 0..names.max(1) {
                types.push(ty.clone());
            }
        }
        types
    }

    fn bind_var_specs(&mut self, unit: &SourceUnit, decl: Node, scope: Range<usize>) {
        let mut specs = Vec::new();
        preorder(decl, &mut |n| {
            if n.kind() == "var_spec" || n.kind() == "const_spec" {
                specs.push(n);
            }
        });
        for spec in specs {
            let mut cursor = spec.walk();
            let names: Vec<Node> = spec.children_by_field_name("name", &mut cursor).collect();
            if names.is_empty() {
                continue;
            }
            let tys = if let Some(ty) = spec.child_by_field_name("type") {
                vec![self.parse_type(unit, ty); names.len()]
            } else if let Some(values) = spec.child_by_field_name("value") {
                self.infer_tuple(unit, names.len(), &named_children(values))
            } else {
                vec![GoType::Unknown; names.len()]
            };
            // file-scope names are visible from the top of the file
            let visible_from = if scope.start == 0 && scope.end == usize::MAX {
                0
            } else {
                spec.end_byte()
            };
            for (name, ty) in names.iter().zip(tys) {
                let name = unit.text(*name).to_string();
                self.push(&name, BindingKind::Var { ty }, scope.clone(), visible_from);
            }
        }
    }

    /// Pairwise or call-positional types for the right side of a
    /// declaration with `count` names.
    fn infer_tuple(&self, unit: &SourceUnit, count: usize, values: &[Node]) -> Vec<GoType> {
        if values.len() == count {
            return values
                .iter()
                .map(|v| self.type_of_expr(unit, *v))
                .collect();
        }
        if values.len() == 1 && count > 1 {
            let call = strip_parens(values[0]);
            if call.kind() == "call_expression" {
                if let Some(fun) = call.child_by_field_name("function") {
                    if fun.kind() == "identifier" {
                        let name = unit.text(fun);
                        if matches!(
                            self.lookup(name, fun.start_byte()).map(|b| &b.kind),
                            Some(BindingKind::Func)
                        ) {
                            if let Some(results) = self.func_results.get(name) {
                                if results.len() == count {
                                    return results.clone();
                                }
                            }
                        }
                    }
                }
            }
        }
        vec![GoType::Unknown; count]
    }

    fn collect_locals(&mut self, unit: &SourceUnit) {
        let mut nodes = Vec::new();
        preorder(unit.root(), &mut |n| match n.kind() {
            "function_declaration" | "method_declaration" | "func_literal" => nodes.push(n),
            "short_var_declaration" => nodes.push(n),
            "var_declaration" | "const_declaration" => {
                // file-scope declarations were handled in the first pass
                if n.parent().map(|p| p.kind()) != Some("source_file") {
                    nodes.push(n);
                }
            }
            "range_clause" => nodes.push(n),
            _ => {}
        });
        for node in nodes {
            match node.kind() {
                "function_declaration" | "method_declaration" | "func_literal" => {
                    self.bind_params(unit, node);
                }
                "short_var_declaration" => self.bind_short_var(unit, node),
                "var_declaration" | "const_declaration" => {
                    let scope = enclosing_scope(node);
                    self.bind_var_specs(unit, node, scope);
                }
                "range_clause" => self.bind_range_clause(unit, node),
                _ => {}
            }
        }
    }

    fn bind_params(&mut self, unit: &SourceUnit, func: Node) {
        let Some(body) = func.child_by_field_name("body") else {
            return;
        };
        let scope = body.start_byte()..body.end_byte();
        for field in ["receiver", "parameters"] {
            let Some(list) = func.child_by_field_name(field) else {
                continue;
            };
            if list.kind() != "parameter_list" {
                continue;
            }
            for decl in named_children(list) {
                match decl.kind() {
                    "parameter_declaration" => {
                        let ty = decl
                            .child_by_field_name("type")
                            .map(|t| self.parse_type(unit, t))
                            .unwrap_or(GoType::Unknown);
                        let mut cursor = decl.walk();
                        let names: Vec<Node> =
                            decl.children_by_field_name("name", &mut cursor).collect();
                        for name in names {
                            let name = unit.text(name).to_string();
                            self.push(
                                &name,
                                BindingKind::Var { ty: ty.clone() },
                                scope.clone(),
                                scope.start,
                            );
                        }
                    }
                    "variadic_parameter_declaration" => {
                        // variadic parameters are slices; their element
                        // type never matters to the matchers
                        if let Some(name) = decl.child_by_field_name("name") {
                            let name = unit.text(name).to_string();
                            self.push(
                                &name,
                                BindingKind::Var {
                                    ty: GoType::Unknown,
                                },
                                scope.clone(),
                                scope.start,
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn bind_short_var(&mut self, unit: &SourceUnit, decl: Node) {
        let Some(left) = decl.child_by_field_name("left") else {
            return;
        };
        let Some(right) = decl.child_by_field_name("right") else {
            return;
        };
        // keep blanks in the list so positional pairing stays aligned
        let names = named_children(left);
        if names.is_empty() {
            return;
        }
        let values = named_children(right);
        let tys = self.infer_tuple(unit, names.len(), &values);
        let scope = enclosing_scope(decl);
        let visible_from = decl.end_byte();
        for (name, ty) in names.iter().zip(tys) {
            if name.kind() != "identifier" && name.kind() != "blank_identifier" {
                continue;
            }
            let name = unit.text(*name).to_string();
            self.push(&name, BindingKind::Var { ty }, scope.clone(), visible_from);
        }
    }

    fn bind_range_clause(&mut self, unit: &SourceUnit, clause: Node) {
        let Some(left) = clause.child_by_field_name("left") else {
            return;
        };
        let scope = enclosing_scope(clause);
        for name in named_children(left) {
            if name.kind() != "identifier" {
                continue;
            }
            let name = unit.text(name).to_string();
            self.push(
                &name,
                BindingKind::Var {
                    ty: GoType::Unknown,
                },
                scope.clone(),
                clause.end_byte(),
            );
        }
    }
}

/// Byte range over which a declaration's names stay visible: from the
/// declaration to the end of the enclosing block, or of the whole
/// statement for `if`/`for`/`switch` header declarations.
fn enclosing_scope(decl: Node) -> Range<usize> {
    let mut ancestor = decl.parent();
    while let Some(node) = ancestor {
        match node.kind() {
            "block" | "source_file" => return decl.start_byte()..node.end_byte(),
            "if_statement"
            | "for_statement"
            | "expression_switch_statement"
            | "type_switch_statement"
            | "select_statement" => return decl.start_byte()..node.end_byte(),
            _ => ancestor = node.parent(),
        }
    }
    decl.start_byte()..usize::MAX
}

/// Package name a bare import defaults to: the last path segment, or the
/// one before it for major-version suffixes like `/v2`.
fn default_package_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    if last.len() > 1
        && last.starts_with('v')
        && last[1..].chars().all(|c| c.is_ascii_digit())
    {
        segments.next().unwrap_or(last)
    } else {
        last
    }
}
