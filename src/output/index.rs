// Index entry accumulation and the hand-written docs check

use crate::analysis::ModuleDescriptor;
use crate::error::{Error, Result};
use crate::output::templates::PageRenderer;
use std::path::{Path, PathBuf};

/// Indentation of a toctree entry
pub const ENTRY_INDENT: &str = "   ";

/// Collects toctree entries while pages are written
#[derive(Debug, Default, Clone)]
pub struct IndexAssembler {
    api_entries: Vec<String>,
    doc_entries: Vec<String>,
}

impl IndexAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a module whose API page was written
    pub fn record_api(&mut self, module: &ModuleDescriptor) {
        self.api_entries.push(entry(&module.generated_stem));
    }

    /// Record a module whose doc page was written
    pub fn record_doc(&mut self, module: &ModuleDescriptor) {
        self.doc_entries.push(entry(&module.generated_stem));
    }

    pub fn api_entries(&self) -> &[String] {
        &self.api_entries
    }

    pub fn doc_entries(&self) -> &[String] {
        &self.doc_entries
    }

    pub fn render_api_index(&self, renderer: &PageRenderer) -> Result<String> {
        renderer.render_api_index(&self.api_entries)
    }

    pub fn render_doc_index(&self, renderer: &PageRenderer) -> Result<String> {
        renderer.render_doc_index(&self.doc_entries)
    }
}

fn entry(stem: &str) -> String {
    format!("{}{}", ENTRY_INDENT, stem)
}

/// Whether the top-level index should link hand-written docs.
///
/// `Ok(false)` if `written_dir` does not exist. If it exists it must hold
/// `index_file`; that page is never generated.
pub fn hand_written_docs(written_dir: &Path, index_file: &str) -> Result<bool> {
    if !written_dir.exists() {
        return Ok(false);
    }

    let index: PathBuf = written_dir.join(index_file);
    if !index.is_file() {
        return Err(Error::HandWrittenIndexMissing {
            index,
            written_dir: written_dir.to_path_buf(),
        });
    }
    Ok(true)
}
