// Binding types extracted from Python source files
//
// A parsed module is reduced to what runtime reflection would report for it:
// the names bound at module level, what kind of value each name holds, and
// which module declared that value.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A parsed Python module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedModule {
    /// Source file path
    pub path: PathBuf,
    /// Fully qualified dotted module name
    pub module_name: String,
    /// Whether the file is a package `__init__`
    pub is_package: bool,
    /// Module-level bindings, in order of first binding
    pub symbols: Vec<Symbol>,
}

impl ParsedModule {
    /// Create an empty parsed module
    pub fn new(path: PathBuf, module_name: String, is_package: bool) -> Self {
        Self {
            path,
            module_name,
            is_package,
            symbols: Vec::new(),
        }
    }

    /// Look up a binding by name
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Check if the module binds anything
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A name bound in a module's namespace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Module the bound value was declared in, when known
    #[serde(default)]
    pub declaring_module: Option<String>,
    /// Whether the value carries a documentation attribute
    #[serde(default = "default_true")]
    pub has_doc_attribute: bool,
    /// Line of the first binding (1-based, 0 if unknown)
    #[serde(default)]
    pub line: usize,
}

fn default_true() -> bool {
    true
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, declaring_module: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            declaring_module: declaring_module.map(str::to_string),
            has_doc_attribute: true,
            line: 0,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Names following the reserved `__x` convention
    pub fn is_dunder(&self) -> bool {
        self.name.starts_with("__")
    }
}

/// Kind of value a name is bound to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    /// Some other object that can be called
    Callable,
    Module,
    Data,
    /// Imported name whose value was not resolved
    Unresolved,
}

impl SymbolKind {
    /// Functions, classes and other callables
    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Class | SymbolKind::Callable)
    }
}

/// A single imported name with optional alias
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedName {
    /// Original name
    pub name: String,
    /// Alias (from `as` clause)
    pub alias: Option<String>,
}

impl ImportedName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn with_alias(name: &str, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    /// Name bound in the importing module. `import a.b` binds `a`.
    pub fn bound_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.name.split('.').next().unwrap_or(&self.name),
        }
    }
}

/// Resolve a relative import against the importing module.
///
/// `level` counts the leading dots. For a plain module the first dot refers
/// to its parent package; for a package `__init__` it refers to the package
/// itself. Returns `None` when the import climbs above the top-level package.
pub fn resolve_relative(
    importer: &str,
    importer_is_package: bool,
    level: usize,
    target: &str,
) -> Option<String> {
    if level == 0 {
        return None;
    }
    let mut parts: Vec<&str> = importer.split('.').collect();
    let drop = if importer_is_package { level - 1 } else { level };
    if drop >= parts.len() {
        return None;
    }
    parts.truncate(parts.len() - drop);
    let base = parts.join(".");
    if target.is_empty() {
        Some(base)
    } else {
        Some(format!("{}.{}", base, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_module_new() {
        let module = ParsedModule::new(PathBuf::from("demo/a.py"), "demo.a".to_string(), false);
        assert_eq!(module.module_name, "demo.a");
        assert!(module.is_empty());
        assert!(module.symbol("f").is_none());
    }

    #[test]
    fn test_symbol_kind_callable() {
        assert!(SymbolKind::Function.is_callable());
        assert!(SymbolKind::Class.is_callable());
        assert!(SymbolKind::Callable.is_callable());
        assert!(!SymbolKind::Module.is_callable());
        assert!(!SymbolKind::Data.is_callable());
        assert!(!SymbolKind::Unresolved.is_callable());
    }

    #[test]
    fn test_symbol_dunder() {
        assert!(Symbol::new("__version__", SymbolKind::Data, None).is_dunder());
        assert!(!Symbol::new("_private", SymbolKind::Data, None).is_dunder());
    }

    #[test]
    fn test_bound_name() {
        assert_eq!(ImportedName::new("os.path").bound_name(), "os");
        assert_eq!(ImportedName::with_alias("os.path", "osp").bound_name(), "osp");
        assert_eq!(ImportedName::new("join").bound_name(), "join");
    }

    #[test]
    fn test_resolve_relative_from_module() {
        assert_eq!(resolve_relative("demo.sub.leaf", false, 1, "util"), Some("demo.sub.util".to_string()));
        assert_eq!(resolve_relative("demo.sub.leaf", false, 2, ""), Some("demo".to_string()));
        assert_eq!(resolve_relative("demo.leaf", false, 2, "x"), None);
    }

    #[test]
    fn test_resolve_relative_from_package() {
        assert_eq!(resolve_relative("demo.sub", true, 1, "leaf"), Some("demo.sub.leaf".to_string()));
        assert_eq!(resolve_relative("demo.sub", true, 2, ""), Some("demo".to_string()));
        assert_eq!(resolve_relative("demo", true, 2, ""), None);
    }

    #[test]
    fn test_symbol_deserialize_defaults() {
        let symbol: Symbol = serde_json::from_str(r#"{"name": "f", "kind": "function"}"#).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Function);
        assert!(symbol.declaring_module.is_none());
        assert!(symbol.has_doc_attribute);
    }
}
