//! autorst - Generate Sphinx documentation stubs from Python packages
//!
//! Walks a package, decides which bindings of each module are documentable
//! members, and writes reStructuredText API pages, doc string pages and
//! index pages for Sphinx's autodoc and autosummary extensions.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod source;

// Re-export main types
pub use analysis::{AnalysisResult, Analyzer, ModuleDescriptor};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{DocGenerator, GenerationReport};
pub use source::{PythonSource, RegistrySource, SymbolSource};
