// Deciding which bindings of a module are documentable members

use crate::config::MemberOrder;
use crate::parser::{Symbol, SymbolKind};
use std::collections::HashSet;

/// Classifies the bindings of one module
#[derive(Debug, Clone, Copy)]
pub struct MemberClassifier<'a> {
    module: &'a str,
}

impl<'a> MemberClassifier<'a> {
    /// Classifier for the module with full dotted name `module`
    pub fn new(module: &'a str) -> Self {
        Self { module }
    }

    /// Whether `symbol` belongs in the module's member listing.
    ///
    /// With a known declaring module: functions, classes and other callables
    /// declared in this very module, so re-exported names are left out.
    /// Without one (compiled modules): anything not `__`-prefixed, not a
    /// module, with a documentation attribute. The fallback is loose and may
    /// admit plain data.
    pub fn is_member(&self, symbol: &Symbol) -> bool {
        match &symbol.declaring_module {
            Some(declared) => symbol.kind.is_callable() && declared == self.module,
            None => {
                !symbol.is_dunder()
                    && symbol.kind != SymbolKind::Module
                    && symbol.has_doc_attribute
            }
        }
    }

    /// Names of all members, in the requested order. A name listed twice
    /// keeps its first position.
    pub fn member_names(&self, symbols: &[Symbol], order: MemberOrder) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names: Vec<String> = symbols
            .iter()
            .filter(|s| self.is_member(s) && seen.insert(s.name.as_str()))
            .map(|s| s.name.clone())
            .collect();

        if order == MemberOrder::Alphabetical {
            names.sort();
        }
        names
    }
}
