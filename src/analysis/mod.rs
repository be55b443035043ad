// Analysis module: namespace discovery, member classification and descriptors

pub mod descriptor;
pub mod members;
pub mod walker;

pub use descriptor::*;
pub use members::*;
pub use walker::*;

use crate::config::{Config, MemberOrder};
use crate::error::Result;
use crate::source::SymbolSource;
use serde::Serialize;
use tracing::{debug, info};

/// Result of analyzing a package
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Root package name as given
    pub package: String,
    /// One descriptor per non-excluded leaf module, in walk order
    pub modules: Vec<ModuleDescriptor>,
}

/// Walks a package and describes every leaf module
pub struct Analyzer {
    walker: NamespaceWalker,
    order: MemberOrder,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let walker = NamespaceWalker::new().with_exclude(config.discovery.exclude.as_deref())?;
        Ok(Self {
            walker,
            order: config.generate.member_order,
        })
    }

    /// Load and describe every leaf module below `package`.
    /// Any module failing to load aborts the whole analysis.
    pub fn analyze(&self, source: &mut dyn SymbolSource, package: &str) -> Result<AnalysisResult> {
        info!(package, "processing package");
        let names = self.walker.walk(source, package)?;

        let mut modules = Vec::with_capacity(names.len());
        for name in &names {
            let descriptor = ModuleDescriptor::build(source, name, self.order)?;
            debug!(
                module = %descriptor.dotted_name,
                members = descriptor.member_names.len(),
                leading_doc = descriptor.has_leading_doc,
                "described module"
            );
            modules.push(descriptor);
        }

        Ok(AnalysisResult {
            package: package.to_string(),
            modules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::source::PythonSource;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("demo");
        fs::create_dir_all(pkg.join("skip")).unwrap();

        fs::write(pkg.join("__init__.py"), "\"\"\"Demo package.\"\"\"\n").unwrap();
        fs::write(
            pkg.join("a.py"),
            "\"\"\"Module a.\"\"\"\n\ndef f():\n    pass\n\nclass C:\n    pass\n",
        )
        .unwrap();
        fs::write(pkg.join("b.py"), "from demo.a import f as g\n").unwrap();
        fs::write(pkg.join("skip").join("__init__.py"), "").unwrap();
        fs::write(pkg.join("skip").join("broken.py"), "def (:\n").unwrap();

        dir
    }

    fn config_for(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.discovery.search_paths = vec![dir.path().to_path_buf()];
        config
    }

    #[test]
    fn test_analyze_describes_modules() {
        let dir = create_test_project();
        let mut config = config_for(&dir);
        config.discovery.exclude = Some(r"demo\.skip\.".to_string());
        let mut source = PythonSource::new(config.discovery.search_paths.clone()).unwrap();

        let result = Analyzer::new(&config).unwrap().analyze(&mut source, "demo").unwrap();
        assert_eq!(result.package, "demo");
        assert_eq!(result.modules.len(), 2);

        let a = &result.modules[0];
        assert_eq!(a.dotted_name, "demo.a");
        assert_eq!(a.member_names, vec!["C", "f"]);
        assert!(a.has_leading_doc);

        let b = &result.modules[1];
        assert_eq!(b.dotted_name, "demo.b");
        assert!(b.member_names.is_empty());
        assert!(!b.has_leading_doc);
    }

    #[test]
    fn test_analyze_fails_on_broken_module() {
        let dir = create_test_project();
        let config = config_for(&dir);
        let mut source = PythonSource::new(config.discovery.search_paths.clone()).unwrap();

        let result = Analyzer::new(&config).unwrap().analyze(&mut source, "demo");
        match result {
            Err(Error::ImportFailure { module, .. }) => assert_eq!(module, "demo.skip.broken"),
            other => panic!("Expected ImportFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_declaration_order() {
        let dir = create_test_project();
        let mut config = config_for(&dir);
        config.discovery.exclude = Some("skip".to_string());
        config.generate.member_order = MemberOrder::Declaration;
        let mut source = PythonSource::new(config.discovery.search_paths.clone()).unwrap();

        let result = Analyzer::new(&config).unwrap().analyze(&mut source, "demo").unwrap();
        assert_eq!(result.modules[0].member_names, vec!["f", "C"]);
    }
}
