// reStructuredText stub generator
//
// Writes the per-module API and doc pages, then the API index, the doc
// index and the top-level index. Every module is already described when
// this runs, so a load failure never leaves half a tree behind.

use crate::analysis::{AnalysisResult, ModuleDescriptor};
use crate::config::Config;
use crate::error::Result;
use crate::output::index::{hand_written_docs, IndexAssembler};
use crate::output::templates::{PageRenderer, RootIndex};
use crate::output::writer::{OutputArtifact, OutputManager, OverwritePolicy, WriteOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stub page generator
pub struct DocGenerator {
    config: Config,
    renderer: PageRenderer,
    writer: OutputManager,
    verbose: bool,
}

impl DocGenerator {
    /// Create a new generator
    pub fn new(config: Config) -> Result<Self> {
        let renderer = PageRenderer::new()?;
        let writer = OutputManager::new(config.output.backup_prefix.clone());
        Ok(Self {
            config,
            renderer,
            writer,
            verbose: false,
        })
    }

    /// Show a progress bar over the module loop
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write every requested artifact for `analysis`
    pub fn generate(&self, analysis: &AnalysisResult) -> Result<GenerationReport> {
        let flags = &self.config.generate;
        let mut report = GenerationReport::default();

        // Checked first so a missing hand-written index leaves nothing written
        let written = if flags.write_index {
            hand_written_docs(&self.written_dir(), &self.index_file())?
        } else {
            false
        };

        self.create_directories()?;

        let page_policy = if flags.overwrite {
            OverwritePolicy::BackupThenWrite
        } else {
            OverwritePolicy::Reject
        };

        let progress = if self.verbose {
            let pb = ProgressBar::new(analysis.modules.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut index = IndexAssembler::new();
        for module in &analysis.modules {
            if let Some(ref pb) = progress {
                pb.set_message(module.dotted_name.clone());
            }
            info!(module = %module.dotted_name, "writing pages");

            if flags.write_api {
                self.generate_api_page(module, page_policy, &mut report)?;
                index.record_api(module);
            }

            if flags.write_doc {
                if module.has_leading_doc {
                    self.generate_doc_page(module, page_policy, &mut report)?;
                    index.record_doc(module);
                } else {
                    debug!(module = %module.dotted_name, "no leading doc string, skipping doc page");
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        if flags.write_api {
            let text = index.render_api_index(&self.renderer)?;
            self.emit(self.index_path(&self.api_dir()), text, page_policy, &mut report)?;
            report.index_pages += 1;
        }

        if flags.write_doc {
            let text = index.render_doc_index(&self.renderer)?;
            self.emit(self.index_path(&self.doc_dir()), text, page_policy, &mut report)?;
            report.index_pages += 1;
        }

        if flags.write_index {
            let output = &self.config.output;
            let root = RootIndex {
                package_name: &analysis.package,
                apipath: &output.apipath,
                docpath: flags.write_doc.then_some(output.docpath.as_str()),
                writtenpath: written.then_some(output.writtenpath.as_str()),
            };
            let text = self.renderer.render_root_index(&root)?;
            let path = self.index_path(&output.source);
            self.emit(path, text, OverwritePolicy::BackupThenWrite, &mut report)?;
            report.index_pages += 1;
        }

        Ok(report)
    }

    /// Create the page directories for the enabled page kinds
    fn create_directories(&self) -> Result<()> {
        let flags = &self.config.generate;
        if flags.write_api {
            self.writer.ensure_dir(&self.api_dir())?;
        }
        if flags.write_doc {
            self.writer.ensure_dir(&self.doc_dir())?;
        }
        if flags.write_index {
            self.writer.ensure_dir(&self.config.output.source)?;
        }
        Ok(())
    }

    fn generate_api_page(
        &self,
        module: &ModuleDescriptor,
        policy: OverwritePolicy,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let text = self.renderer.render_api_page(module)?;
        let path = self.page_path(&self.api_dir(), module);
        self.emit(path, text, policy, report)?;
        report.api_pages += 1;
        Ok(())
    }

    fn generate_doc_page(
        &self,
        module: &ModuleDescriptor,
        policy: OverwritePolicy,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let text = self.renderer.render_doc_page(module)?;
        let path = self.page_path(&self.doc_dir(), module);
        self.emit(path, text, policy, report)?;
        report.doc_pages += 1;
        Ok(())
    }

    fn emit(
        &self,
        path: PathBuf,
        content: String,
        policy: OverwritePolicy,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let artifact = OutputArtifact::new(path, content, policy);
        if let WriteOutcome::Replaced { backup } = self.writer.write(&artifact)? {
            report.backups.push(backup);
        }
        report.written.push(artifact.path);
        Ok(())
    }

    /// `<source>/<apipath>`
    pub fn api_dir(&self) -> PathBuf {
        self.config.output.source.join(&self.config.output.apipath)
    }

    /// `<source>/<docpath>`
    pub fn doc_dir(&self) -> PathBuf {
        self.config.output.source.join(&self.config.output.docpath)
    }

    /// `<source>/<writtenpath>`
    pub fn written_dir(&self) -> PathBuf {
        self.config.output.source.join(&self.config.output.writtenpath)
    }

    fn index_file(&self) -> String {
        format!("index.{}", self.config.output.extension)
    }

    fn index_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.index_file())
    }

    fn page_path(&self, dir: &Path, module: &ModuleDescriptor) -> PathBuf {
        dir.join(format!(
            "{}.{}",
            module.generated_stem, self.config.output.extension
        ))
    }
}

/// Report of what was generated
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub api_pages: usize,
    pub doc_pages: usize,
    pub index_pages: usize,
    /// Every file written, in write order
    pub written: Vec<PathBuf>,
    /// Backups made of replaced files
    pub backups: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} API pages, {} doc pages, {} index pages, {} backups",
            self.api_pages,
            self.doc_pages,
            self.index_pages,
            self.backups.len()
        )
    }
}
