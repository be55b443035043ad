// Page rendering with embedded reStructuredText templates

use crate::analysis::ModuleDescriptor;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Rule character used when `underline` gets no `char` argument
const DEFAULT_RULE: &str = "=";

/// Values substituted into the top-level index page
#[derive(Debug, Clone, Serialize)]
pub struct RootIndex<'a> {
    pub package_name: &'a str,
    pub apipath: &'a str,
    /// Set only when doc pages were requested
    pub docpath: Option<&'a str>,
    /// Set only when the hand-written docs directory exists
    pub writtenpath: Option<&'a str>,
}

/// Tera wrapper holding the fixed page templates
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("api.rst", include_str!("../../templates/api.rst.tera")),
            ("doc.rst", include_str!("../../templates/doc.rst.tera")),
            ("api_index.rst", include_str!("../../templates/api_index.rst.tera")),
            ("doc_index.rst", include_str!("../../templates/doc_index.rst.tera")),
            ("index.rst", include_str!("../../templates/index.rst.tera")),
        ])?;

        tera.register_filter("underline", underline);

        Ok(Self { tera })
    }

    /// Member listing page for one module
    pub fn render_api_page(&self, module: &ModuleDescriptor) -> Result<String> {
        let context = Context::from_serialize(module)?;
        Ok(self.tera.render("api.rst", &context)?)
    }

    /// Doc string only page for one module
    pub fn render_doc_page(&self, module: &ModuleDescriptor) -> Result<String> {
        let context = Context::from_serialize(module)?;
        Ok(self.tera.render("doc.rst", &context)?)
    }

    pub fn render_api_index(&self, entries: &[String]) -> Result<String> {
        self.render_entries("api_index.rst", entries)
    }

    pub fn render_doc_index(&self, entries: &[String]) -> Result<String> {
        self.render_entries("doc_index.rst", entries)
    }

    /// Top-level index linking the generated and hand-written indices
    pub fn render_root_index(&self, root: &RootIndex<'_>) -> Result<String> {
        let context = Context::from_serialize(root)?;
        Ok(self.tera.render("index.rst", &context)?)
    }

    fn render_entries(&self, template_name: &str, entries: &[String]) -> Result<String> {
        let mut context = Context::new();
        context.insert("entries", entries);
        Ok(self.tera.render(template_name, &context)?)
    }
}

/// Rule of the same character length as the value, e.g. a section underline
fn underline(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    let rule = args
        .get("char")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_RULE);

    Ok(Value::String(rule.repeat(s.chars().count())))
}
