// Python package trees on disk

use crate::error::{Error, Result};
use crate::parser::{ParsedModule, PythonParser};
use crate::source::{LoadedModule, NamespaceNode, SymbolSource};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Compiled extension suffixes
const EXTENSION_SUFFIXES: [&str; 2] = [".so", ".pyd"];

/// Where a dotted name lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    /// Directory holding `__init__.py`
    Package(PathBuf),
    /// Plain `.py` module
    Source(PathBuf),
    /// Compiled extension module
    Extension(PathBuf),
}

/// Statically analyzed Python package tree
pub struct PythonSource {
    search_paths: Vec<PathBuf>,
    parser: PythonParser,
    locations: HashMap<String, Location>,
    initialized: HashSet<String>,
}

impl PythonSource {
    /// Create a source looking up top-level packages in `search_paths`, in order
    pub fn new(search_paths: Vec<PathBuf>) -> Result<Self> {
        Ok(Self {
            search_paths,
            parser: PythonParser::new()?,
            locations: HashMap::new(),
            initialized: HashSet::new(),
        })
    }

    /// Find a dotted name, resolving parents first
    fn locate(&mut self, name: &str) -> Result<Location> {
        if let Some(location) = self.locations.get(name) {
            return Ok(location.clone());
        }

        let location = match name.rsplit_once('.') {
            None => self
                .search_paths
                .iter()
                .find_map(|dir| find_in_dir(dir, name)),
            Some((parent, leaf)) => match self.locate(parent)? {
                Location::Package(dir) => find_in_dir(&dir, leaf),
                _ => {
                    return Err(Error::import_failure(
                        name,
                        format!("'{}' is not a package", parent),
                    ))
                }
            },
        };

        let location = location
            .ok_or_else(|| Error::import_failure(name, format!("No module named '{}'", name)))?;
        self.locations.insert(name.to_string(), location.clone());
        Ok(location)
    }

    /// Parse a file, reporting any failure as an import failure of `module`
    fn parse(&mut self, path: &Path, module: &str) -> Result<(ParsedModule, String)> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::import_failure(module, format!("{}: {}", path.display(), e)))?;
        let is_package = path.file_stem().map_or(false, |s| s == "__init__");
        let parsed = self
            .parser
            .parse_source(&text, path.to_path_buf(), module.to_string(), is_package)
            .map_err(|e| Error::import_failure(module, format!("{}: {}", path.display(), e)))?;
        Ok((parsed, text))
    }

    /// Parse a package's `__init__.py` once, the way importing it would
    fn initialize(&mut self, package: &str, dir: &Path) -> Result<()> {
        if self.initialized.contains(package) {
            return Ok(());
        }
        self.parse(&dir.join("__init__.py"), package)?;
        self.initialized.insert(package.to_string());
        Ok(())
    }
}

impl SymbolSource for PythonSource {
    fn children(&mut self, package: &str) -> Result<Vec<NamespaceNode>> {
        let dir = match self.locate(package)? {
            Location::Package(dir) => dir,
            _ => {
                return Err(Error::import_failure(
                    package,
                    format!("'{}' is a module, not a package", package),
                ))
            }
        };
        self.initialize(package, &dir)?;

        let entries = scan_dir(&dir)
            .map_err(|e| Error::import_failure(package, e.to_string()))?;

        let mut children = Vec::with_capacity(entries.len());
        for (leaf, location) in entries {
            let name = format!("{}.{}", package, leaf);
            let node = match location {
                Location::Package(_) => NamespaceNode::package(&name),
                _ => NamespaceNode::module(&name),
            };
            self.locations.insert(name, location);
            children.push(node);
        }
        debug!(package, children = children.len(), "scanned package");
        Ok(children)
    }

    fn load(&mut self, module: &str) -> Result<LoadedModule> {
        match self.locate(module)? {
            Location::Source(path) => {
                let (parsed, text) = self.parse(&path, module)?;
                Ok(LoadedModule {
                    name: module.to_string(),
                    symbols: parsed.symbols,
                    source: Some(text),
                })
            }
            // packages are walked, never loaded as leaves
            Location::Package(_) => Err(Error::import_failure(
                module,
                format!("'{}' is a package, not a module", module),
            )),
            Location::Extension(path) => {
                let leaf = module.rsplit('.').next().unwrap_or(module);
                let stub = path.with_file_name(format!("{}.pyi", leaf));
                let symbols = if stub.is_file() {
                    let (parsed, _) = self.parse(&stub, module)?;
                    // compiled objects carry no reliable declaring module
                    parsed
                        .symbols
                        .into_iter()
                        .map(|mut s| {
                            s.declaring_module = None;
                            s
                        })
                        .collect()
                } else {
                    warn!(module, path = %path.display(), "extension module without .pyi stub, no members listed");
                    Vec::new()
                };
                Ok(LoadedModule {
                    name: module.to_string(),
                    symbols,
                    source: None,
                })
            }
        }
    }
}

/// Importable children of a directory, sorted by file name.
/// The first entry for a name wins, so packages shadow same-named files.
fn scan_dir(dir: &Path) -> Result<Vec<(String, Location)>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let path = entry.path();

        let found = if entry.file_type().is_dir() {
            path.join("__init__.py")
                .is_file()
                .then(|| (file_name.to_string(), Location::Package(path.to_path_buf())))
        } else {
            module_file(file_name, path)
        };

        if let Some((name, location)) = found {
            if is_identifier(&name) && seen.insert(name.clone()) {
                entries.push((name, location));
            }
        }
    }

    Ok(entries)
}

/// Classify a plain file as a module
fn module_file(file_name: &str, path: &Path) -> Option<(String, Location)> {
    if let Some(stem) = file_name.strip_suffix(".py") {
        if stem == "__init__" {
            return None;
        }
        return Some((stem.to_string(), Location::Source(path.to_path_buf())));
    }
    if EXTENSION_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix)) {
        let name = file_name.split('.').next().unwrap_or_default();
        return Some((name.to_string(), Location::Extension(path.to_path_buf())));
    }
    None
}

/// Find `name` directly inside `dir`
fn find_in_dir(dir: &Path, name: &str) -> Option<Location> {
    let package = dir.join(name);
    if package.join("__init__.py").is_file() {
        return Some(Location::Package(package));
    }
    let source = dir.join(format!("{}.py", name));
    if source.is_file() {
        return Some(Location::Source(source));
    }
    scan_dir(dir)
        .ok()?
        .into_iter()
        .find(|(found, location)| found == name && matches!(location, Location::Extension(_)))
        .map(|(_, location)| location)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
