// Python binding extractor using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Parser for Python source and stub files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse Python source code
    pub fn parse_source(
        &mut self,
        source: &str,
        path: PathBuf,
        module_name: String,
        is_package: bool,
    ) -> Result<ParsedModule> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse source"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(Error::parser(format!(
                "invalid syntax near line {}",
                first_error_line(&root)
            )));
        }

        let mut module = ParsedModule::new(path, module_name, is_package);

        let mut bindings = Bindings::new(&module.module_name, is_package);
        bindings.collect(&root, source.as_bytes());
        let symbols = bindings.finish();
        debug!(module = %module.module_name, symbols = symbols.len(), "parsed module");

        module.symbols = symbols;
        Ok(module)
    }
}

/// Line of the first syntax error below `node`
fn first_error_line(node: &Node) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_line(&child);
        }
    }
    node.start_position().row + 1
}

fn text<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok()
}

/// Module-level name table built while walking the tree
struct Bindings<'m> {
    module: &'m str,
    is_package: bool,
    symbols: Vec<Symbol>,
    positions: HashMap<String, usize>,
    /// Module paths bound by `import` statements
    module_targets: HashMap<String, String>,
    /// Local classes defining `__call__`
    callable_classes: HashSet<String>,
}

impl<'m> Bindings<'m> {
    fn new(module: &'m str, is_package: bool) -> Self {
        Self {
            module,
            is_package,
            symbols: Vec::new(),
            positions: HashMap::new(),
            module_targets: HashMap::new(),
            callable_classes: HashSet::new(),
        }
    }

    fn finish(self) -> Vec<Symbol> {
        self.symbols
    }

    /// Bind a name. Rebinding replaces the value but keeps the first position.
    fn bind(&mut self, symbol: Symbol) {
        self.module_targets.remove(&symbol.name);
        self.callable_classes.remove(&symbol.name);
        match self.positions.get(&symbol.name) {
            Some(&idx) => {
                let line = self.symbols[idx].line;
                self.symbols[idx] = Symbol { line, ..symbol };
            }
            None => {
                self.positions.insert(symbol.name.clone(), self.symbols.len());
                self.symbols.push(symbol);
            }
        }
    }

    /// Drop a binding, as `del name` does
    fn unbind(&mut self, name: &str) {
        self.module_targets.remove(name);
        self.callable_classes.remove(name);
        if let Some(idx) = self.positions.remove(name) {
            self.symbols.remove(idx);
            for pos in self.positions.values_mut() {
                if *pos > idx {
                    *pos -= 1;
                }
            }
        }
    }

    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.positions.get(name).map(|&idx| &self.symbols[idx])
    }

    /// Walk a statement list, descending into top-level compound blocks.
    ///
    /// Every branch counts as executed, except the body of an
    /// `if __name__ == "__main__":` guard, which never runs on import. Loop
    /// targets stay bound even if the iterable would be empty.
    fn collect(&mut self, node: &Node, source: &[u8]) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" | "class_definition" | "decorated_definition" => {
                    self.definition(&child, source)
                }
                "import_statement" => self.import(&child, source),
                "import_from_statement" => self.import_from(&child, source),
                "future_import_statement" => self.future_import(&child, source),
                "expression_statement" => self.expression_statement(&child, source),
                "delete_statement" => self.delete(&child, source),
                "if_statement" | "elif_clause" => self.conditional(&child, source),
                "for_statement" => {
                    if let Some(target) = child.child_by_field_name("left") {
                        let line = child.start_position().row + 1;
                        self.bind_target(&target, SymbolKind::Data, None, line, source);
                    }
                    self.collect(&child, source);
                }
                "else_clause" | "try_statement" | "except_clause" | "except_group_clause"
                | "finally_clause" | "with_statement" | "while_statement" | "block" => {
                    self.collect(&child, source)
                }
                _ => {}
            }
        }
    }

    /// `if`/`elif` with its alternatives, skipping a `__main__` guard body
    fn conditional(&mut self, node: &Node, source: &[u8]) {
        let main_guard = node
            .child_by_field_name("condition")
            .map_or(false, |c| is_main_guard(&c, source));
        let consequence = node.child_by_field_name("consequence").map(|c| c.id());

        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            if main_guard && Some(part.id()) == consequence {
                debug!(module = self.module, line = part.start_position().row + 1, "skipping __main__ block");
                continue;
            }
            match part.kind() {
                "block" | "else_clause" => self.collect(&part, source),
                "elif_clause" => self.conditional(&part, source),
                _ => {}
            }
        }
    }

    /// `del a, b`
    fn delete(&mut self, node: &Node, source: &[u8]) {
        let mut cursor = node.walk();
        for target in node.named_children(&mut cursor) {
            let names: Vec<&str> = if target.kind() == "identifier" {
                text(&target, source).into_iter().collect()
            } else {
                let mut inner = target.walk();
                target
                    .named_children(&mut inner)
                    .filter(|n| n.kind() == "identifier")
                    .filter_map(|n| text(&n, source))
                    .collect()
            };
            for name in names {
                self.unbind(name);
            }
        }
    }

    fn definition(&mut self, node: &Node, source: &[u8]) {
        let def = if node.kind() == "decorated_definition" {
            match node.child_by_field_name("definition") {
                Some(def) => def,
                None => return,
            }
        } else {
            *node
        };
        let Some(name) = def.child_by_field_name("name").and_then(|n| text(&n, source)) else {
            return;
        };
        let here = self.module;
        let line = node.start_position().row + 1;

        match def.kind() {
            "function_definition" => {
                self.bind(Symbol::new(name, SymbolKind::Function, Some(here)).at_line(line));
            }
            "class_definition" => {
                self.bind(Symbol::new(name, SymbolKind::Class, Some(here)).at_line(line));
                if defines_call(&def, source) {
                    self.callable_classes.insert(name.to_string());
                }
            }
            _ => {}
        }
    }

    /// `import a.b` / `import a.b as c`
    fn import(&mut self, node: &Node, source: &[u8]) {
        let line = node.start_position().row + 1;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let Some(imported) = imported_name(&child, source) else {
                continue;
            };
            let bound = imported.bound_name().to_string();
            let target = if imported.alias.is_some() {
                imported.name.clone()
            } else {
                bound.clone()
            };

            self.bind(Symbol::new(&bound, SymbolKind::Module, None).at_line(line));
            self.module_targets.insert(bound, target);
        }
    }

    /// `from m import y` / `from .m import y as z`
    fn import_from(&mut self, node: &Node, source: &[u8]) {
        let line = node.start_position().row + 1;
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };

        let module = if module_node.kind() == "relative_import" {
            let mut level = 0;
            let mut target = "";
            let mut cursor = module_node.walk();
            for part in module_node.children(&mut cursor) {
                match part.kind() {
                    "import_prefix" => {
                        level = text(&part, source).map_or(0, |p| p.matches('.').count());
                    }
                    "dotted_name" => target = text(&part, source).unwrap_or(""),
                    _ => {}
                }
            }
            resolve_relative(self.module, self.is_package, level, target)
                .unwrap_or_else(|| target.to_string())
        } else {
            let Some(name) = text(&module_node, source) else {
                return;
            };
            name.to_string()
        };

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            if let Some(imported) = imported_name(&child, source) {
                names.push(imported);
            }
        }

        self.bind_from_import(&module, &names, line);
    }

    /// `from __future__ import annotations`
    fn future_import(&mut self, node: &Node, source: &[u8]) {
        let line = node.start_position().row + 1;
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if let Some(imported) = imported_name(&child, source) {
                names.push(imported);
            }
        }
        self.bind_from_import("__future__", &names, line);
    }

    fn bind_from_import(&mut self, module: &str, names: &[ImportedName], line: usize) {
        for imported in names {
            self.bind(
                Symbol::new(imported.bound_name(), SymbolKind::Unresolved, Some(module))
                    .at_line(line),
            );
        }
    }

    /// Module-level assignments, including chained and annotated ones
    fn expression_statement(&mut self, node: &Node, source: &[u8]) {
        let Some(assignment) = node.named_child(0) else {
            return;
        };
        if assignment.kind() != "assignment" {
            return;
        }
        let line = node.start_position().row + 1;

        let mut targets = Vec::new();
        let mut current = assignment;
        let value = loop {
            if let Some(left) = current.child_by_field_name("left") {
                targets.push(left);
            }
            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                Some(right) => break right,
                // bare annotation, nothing is bound
                None => return,
            }
        };

        let (kind, declaring) = self.classify_value(&value, source);
        for target in targets {
            self.bind_target(&target, kind, declaring.as_deref(), line, source);
        }
    }

    /// Bind an assignment or loop target. Unpacked names become plain data.
    fn bind_target(
        &mut self,
        target: &Node,
        kind: SymbolKind,
        declaring: Option<&str>,
        line: usize,
        source: &[u8],
    ) {
        match target.kind() {
            "identifier" => {
                if let Some(name) = text(target, source) {
                    self.bind(Symbol::new(name, kind, declaring).at_line(line));
                }
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let mut cursor = target.walk();
                let names: Vec<&str> = target
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "identifier")
                    .filter_map(|n| text(&n, source))
                    .collect();
                for name in names {
                    self.bind(Symbol::new(name, SymbolKind::Data, None).at_line(line));
                }
            }
            _ => {}
        }
    }

    /// Kind and declaring module of an assigned value
    fn classify_value(&self, value: &Node, source: &[u8]) -> (SymbolKind, Option<String>) {
        match value.kind() {
            "lambda" => (SymbolKind::Function, Some(self.module.to_string())),
            "identifier" => match text(value, source).and_then(|n| self.lookup(n)) {
                Some(symbol) => (symbol.kind, symbol.declaring_module.clone()),
                None => (SymbolKind::Unresolved, Some("builtins".to_string())),
            },
            "attribute" => match self.imported_base(value, source) {
                Some(target) => (SymbolKind::Unresolved, Some(target)),
                None => (SymbolKind::Data, None),
            },
            "call" => self.call_result(value, source),
            _ => (SymbolKind::Data, None),
        }
    }

    /// Best guess at what calling `callee(...)` produces
    fn call_result(&self, call: &Node, source: &[u8]) -> (SymbolKind, Option<String>) {
        let Some(callee) = call.child_by_field_name("function") else {
            return (SymbolKind::Data, None);
        };
        match callee.kind() {
            "identifier" => {
                let Some(name) = text(&callee, source) else {
                    return (SymbolKind::Data, None);
                };
                match self.lookup(name) {
                    Some(s) if s.kind == SymbolKind::Class && s.declaring_module.as_deref() == Some(self.module) => {
                        let kind = if self.callable_classes.contains(name) {
                            SymbolKind::Callable
                        } else {
                            SymbolKind::Data
                        };
                        (kind, Some(self.module.to_string()))
                    }
                    Some(s) if s.kind == SymbolKind::Unresolved => {
                        (SymbolKind::Data, s.declaring_module.clone())
                    }
                    _ => (SymbolKind::Data, None),
                }
            }
            "attribute" => (SymbolKind::Data, self.imported_base(&callee, source)),
            _ => (SymbolKind::Data, None),
        }
    }

    /// Module path behind the leftmost name of `a.b.c`, if `a` was imported
    fn imported_base(&self, attribute: &Node, source: &[u8]) -> Option<String> {
        let mut node = *attribute;
        while node.kind() == "attribute" {
            node = node.child_by_field_name("object")?;
        }
        if node.kind() != "identifier" {
            return None;
        }
        self.module_targets.get(text(&node, source)?).cloned()
    }
}

/// `__name__ == "__main__"`, operands in either order
fn is_main_guard(condition: &Node, source: &[u8]) -> bool {
    if condition.kind() != "comparison_operator" || condition.named_child_count() != 2 {
        return false;
    }
    let mut cursor = condition.walk();
    let is_eq = condition
        .children_by_field_name("operators", &mut cursor)
        .all(|op| op.kind() == "==");
    let (Some(left), Some(right)) = (condition.named_child(0), condition.named_child(1)) else {
        return false;
    };
    let is_name = |n: &Node| n.kind() == "identifier" && text(n, source) == Some("__name__");
    let is_main = |n: &Node| {
        n.kind() == "string" && matches!(text(n, source), Some("\"__main__\"") | Some("'__main__'"))
    };
    is_eq && ((is_name(&left) && is_main(&right)) || (is_main(&left) && is_name(&right)))
}

/// `dotted_name` or `aliased_import` inside an import statement
fn imported_name(node: &Node, source: &[u8]) -> Option<ImportedName> {
    match node.kind() {
        "dotted_name" => Some(ImportedName::new(text(node, source)?)),
        "aliased_import" => {
            let name = text(&node.child_by_field_name("name")?, source)?;
            let alias = text(&node.child_by_field_name("alias")?, source)?;
            Some(ImportedName::with_alias(name, alias))
        }
        _ => None,
    }
}

/// Whether a class body defines `__call__`
fn defines_call(class: &Node, source: &[u8]) -> bool {
    let Some(body) = class.child_by_field_name("body") else {
        return false;
    };
    let mut cursor = body.walk();
    let found = body.named_children(&mut cursor).any(|stmt| {
        let def = if stmt.kind() == "decorated_definition" {
            stmt.child_by_field_name("definition")
        } else {
            Some(stmt)
        };
        def.filter(|d| d.kind() == "function_definition")
            .and_then(|d| d.child_by_field_name("name"))
            .and_then(|n| text(&n, source))
            == Some("__call__")
    });
    found
}
