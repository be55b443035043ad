// Recursive namespace discovery

use crate::error::Result;
use crate::source::SymbolSource;
use regex::Regex;
use tracing::debug;

/// Enumerates the leaf modules below a root package
#[derive(Debug, Default)]
pub struct NamespaceWalker {
    exclude: Option<Regex>,
}

impl NamespaceWalker {
    /// Create a walker that keeps every module
    pub fn new() -> Self {
        Self { exclude: None }
    }

    /// Drop modules whose full dotted name matches `pattern` anywhere
    pub fn with_exclude(mut self, pattern: Option<&str>) -> Result<Self> {
        self.exclude = pattern.map(Regex::new).transpose()?;
        Ok(self)
    }

    /// Check a full dotted name against the exclusion pattern
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.as_ref().map_or(false, |rex| rex.is_match(name))
    }

    /// Leaf modules below `root`, in the order the source reports them.
    /// Subpackages are descended into but never returned.
    pub fn walk(&self, source: &mut dyn SymbolSource, root: &str) -> Result<Vec<String>> {
        let mut modules = Vec::new();
        self.descend(source, root, &mut modules)?;
        Ok(modules)
    }

    fn descend(
        &self,
        source: &mut dyn SymbolSource,
        package: &str,
        modules: &mut Vec<String>,
    ) -> Result<()> {
        for child in source.children(package)? {
            if child.is_package {
                self.descend(source, &child.name, modules)?;
            } else if self.is_excluded(&child.name) {
                debug!(module = %child.name, "excluded");
            } else {
                modules.push(child.name);
            }
        }
        Ok(())
    }
}
