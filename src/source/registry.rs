// Prebuilt symbol registry, in memory or loaded from a JSON manifest

use crate::error::{Error, Result};
use crate::parser::Symbol;
use crate::source::{LoadedModule, NamespaceNode, SymbolSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One registered namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisteredModule {
    pub package: bool,
    pub symbols: Vec<Symbol>,
    pub source: Option<String>,
}

/// Registry of namespaces keyed by dotted name.
///
/// ```json
/// { "modules": {
///     "demo":   { "package": true },
///     "demo.a": { "symbols": [{ "name": "f", "kind": "function", "declaring_module": "demo.a" }],
///                 "source": "\"\"\"Doc.\"\"\"\n" } } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySource {
    modules: BTreeMap<String, RegisteredModule>,
}

impl RegistrySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON manifest
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON manifest from disk
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Register a package
    pub fn with_package(mut self, name: &str) -> Self {
        self.insert(
            name,
            RegisteredModule {
                package: true,
                ..Default::default()
            },
        );
        self
    }

    /// Register a leaf module
    pub fn with_module(mut self, name: &str, symbols: Vec<Symbol>, source: Option<&str>) -> Self {
        self.insert(
            name,
            RegisteredModule {
                package: false,
                symbols,
                source: source.map(str::to_string),
            },
        );
        self
    }

    pub fn insert(&mut self, name: &str, module: RegisteredModule) {
        self.modules.insert(name.to_string(), module);
    }

    fn get(&self, name: &str) -> Result<&RegisteredModule> {
        self.modules
            .get(name)
            .ok_or_else(|| Error::import_failure(name, format!("No module named '{}'", name)))
    }
}

impl SymbolSource for RegistrySource {
    fn children(&mut self, package: &str) -> Result<Vec<NamespaceNode>> {
        if !self.get(package)?.package {
            return Err(Error::import_failure(
                package,
                format!("'{}' is a module, not a package", package),
            ));
        }

        let prefix = format!("{}.", package);
        Ok(self
            .modules
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter(|(name, _)| !name[prefix.len()..].contains('.'))
            .map(|(name, module)| NamespaceNode {
                name: name.clone(),
                is_package: module.package,
            })
            .collect())
    }

    fn load(&mut self, module: &str) -> Result<LoadedModule> {
        let registered = self.get(module)?;
        Ok(LoadedModule {
            name: module.to_string(),
            symbols: registered.symbols.clone(),
            source: registered.source.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SymbolKind;

    fn demo_registry() -> RegistrySource {
        RegistrySource::new()
            .with_package("demo")
            .with_module(
                "demo.a",
                vec![Symbol::new("f", SymbolKind::Function, Some("demo.a"))],
                Some("\"\"\"Doc.\"\"\"\n"),
            )
            .with_package("demo.sub")
            .with_module("demo.sub.leaf", vec![], None)
            .with_module("demo.b", vec![], None)
            .with_module("demox", vec![], None)
    }

    #[test]
    fn test_children() {
        let mut registry = demo_registry();
        let children = registry.children("demo").unwrap();
        assert_eq!(
            children,
            vec![
                NamespaceNode::module("demo.a"),
                NamespaceNode::module("demo.b"),
                NamespaceNode::package("demo.sub"),
            ]
        );
    }

    #[test]
    fn test_children_of_module_fails() {
        let mut registry = demo_registry();
        assert!(matches!(registry.children("demo.a"), Err(Error::ImportFailure { .. })));
        assert!(matches!(registry.children("missing"), Err(Error::ImportFailure { .. })));
    }

    #[test]
    fn test_load() {
        let mut registry = demo_registry();
        let module = registry.load("demo.a").unwrap();
        assert_eq!(module.symbols.len(), 1);
        assert_eq!(module.source.as_deref(), Some("\"\"\"Doc.\"\"\"\n"));
        assert!(registry.load("demo.c").is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "modules": {
                "ext": { "package": true },
                "ext.fast": {
                    "symbols": [
                        { "name": "solve", "kind": "callable" },
                        { "name": "__doc__", "kind": "data" }
                    ]
                }
            }
        }"#;
        let mut registry = RegistrySource::from_json(json).unwrap();
        assert_eq!(registry.children("ext").unwrap(), vec![NamespaceNode::module("ext.fast")]);

        let module = registry.load("ext.fast").unwrap();
        assert_eq!(module.symbols[0].kind, SymbolKind::Callable);
        assert!(module.symbols[0].declaring_module.is_none());
        assert!(module.source.is_none());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(RegistrySource::from_json("{ nope"), Err(Error::Json(_))));
    }
}
