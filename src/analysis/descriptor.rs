// Per-module name variants and inspection summary

use crate::analysis::members::MemberClassifier;
use crate::config::MemberOrder;
use crate::error::Result;
use crate::source::{LoadedModule, SymbolSource};
use serde::Serialize;

/// Prefix of generated page stems. Keeps e.g. a module `pkg.index` from
/// colliding with the `index` page the renderer builds for `pkg`.
pub const STEM_PREFIX: &str = "__autodoc_module__";

/// Marker opening a module doc string
pub const DOC_MARKER: &str = "\"\"\"";

/// Number of source lines probed for a leading doc string
const DOC_PROBE_LINES: usize = 3;

/// Everything the renderer needs to know about one leaf module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    /// `pkg.sub.leaf`
    pub dotted_name: String,
    /// `pkg`
    pub root_name: String,
    /// `leaf`
    pub basename: String,
    /// `sub.leaf`, empty for a single-segment name
    pub relative_name: String,
    /// Output file stem, unique per run
    pub generated_stem: String,
    pub member_names: Vec<String>,
    pub has_leading_doc: bool,
}

impl ModuleDescriptor {
    /// Name variants only, no members and no leading doc
    pub fn from_name(dotted_name: &str) -> Self {
        let (root_name, relative_name) = match dotted_name.split_once('.') {
            Some((root, rest)) => (root, rest),
            None => (dotted_name, ""),
        };
        let basename = dotted_name.rsplit('.').next().unwrap_or(dotted_name);

        Self {
            dotted_name: dotted_name.to_string(),
            root_name: root_name.to_string(),
            basename: basename.to_string(),
            relative_name: relative_name.to_string(),
            generated_stem: format!("{}{}", STEM_PREFIX, dotted_name),
            member_names: Vec::new(),
            has_leading_doc: false,
        }
    }

    /// Describe an already loaded module
    pub fn from_loaded(module: &LoadedModule, order: MemberOrder) -> Self {
        let mut descriptor = Self::from_name(&module.name);
        descriptor.member_names =
            MemberClassifier::new(&module.name).member_names(&module.symbols, order);
        descriptor.has_leading_doc = has_leading_doc(module.source.as_deref());
        descriptor
    }

    /// Load `dotted_name` from `source` and describe it
    pub fn build(
        source: &mut dyn SymbolSource,
        dotted_name: &str,
        order: MemberOrder,
    ) -> Result<Self> {
        let module = source.load(dotted_name)?;
        Ok(Self::from_loaded(&module, order))
    }
}

/// True iff one of the first three lines starts with the doc marker
pub fn has_leading_doc(source: Option<&str>) -> bool {
    source.map_or(false, |text| {
        text.lines()
            .take(DOC_PROBE_LINES)
            .any(|line| line.starts_with(DOC_MARKER))
    })
}
