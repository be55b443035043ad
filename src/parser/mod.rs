// Parser module for extracting module-level bindings from Python sources

pub mod ast;
mod python;

pub use ast::*;
pub use python::PythonParser;
