// Symbol sources: where namespaces and their bindings come from
//
// The rest of the pipeline only sees this interface. `PythonSource` scans a
// package tree on disk; `RegistrySource` serves a prebuilt registry, e.g. a
// JSON dump produced by runtime reflection.

mod python;
mod registry;

pub use python::PythonSource;
pub use registry::{RegisteredModule, RegistrySource};

use crate::config::Config;
use crate::error::Result;
use crate::parser::Symbol;
use serde::Serialize;

/// A direct child of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceNode {
    /// Fully qualified dotted name
    pub name: String,
    /// Subpackages are descended into, never documented themselves
    pub is_package: bool,
}

impl NamespaceNode {
    pub fn module(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_package: false,
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_package: true,
        }
    }
}

/// A loaded leaf module
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub name: String,
    /// Module-level bindings in order of first binding
    pub symbols: Vec<Symbol>,
    /// Backing source text, if retrievable
    pub source: Option<String>,
}

/// Provides the namespace tree and per-module bindings
pub trait SymbolSource {
    /// Direct children of `package`, in discovery order.
    /// Fails with `ImportFailure` if the package cannot be loaded.
    fn children(&mut self, package: &str) -> Result<Vec<NamespaceNode>>;

    /// Load one module. Fails with `ImportFailure` if it cannot be loaded.
    fn load(&mut self, module: &str) -> Result<LoadedModule>;
}

/// Open the source a config asks for
pub fn open_source(config: &Config) -> Result<Box<dyn SymbolSource>> {
    match &config.discovery.manifest {
        Some(manifest) => Ok(Box::new(RegistrySource::load_file(manifest)?)),
        None => Ok(Box::new(PythonSource::new(
            config.discovery.search_paths.clone(),
        )?)),
    }
}
