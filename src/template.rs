//! Named templates and the pool pages are matched against.
//!
//! Templates are discovered under the templates root: every `.liquid` or
//! `.html` file becomes a template named by its file stem.
//!
//! ```text
//! templates/
//! ├── root.liquid          → "root" (the default for pages without a template key)
//! ├── post.html            → "post"
//! └── partials/
//!     └── header.liquid    → "header"; also includable as
//!                            "partials/header.liquid" or "partials/header"
//! ```
//!
//! A page picks its template through the `template` (or `Template`) metadata
//! key. Matching is exact; there is no fallback to `root` for unknown names.
//!
//! Liquid is strict about lookups: `{{ page.meta.title }}` on a page without
//! a `title` key is a render error, which aborts the build. Guard optional
//! keys:
//!
//! ```liquid
//! {% if page.meta.title %}{{ page.meta.title }}{% else %}{{ page.title }}{% endif %}
//! ```

use crate::meta::{self, Meta};
use crate::naming;
use crate::types::{Page, PageContext};
use liquid::partials::{EagerCompiler, InMemorySource};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Template used when a page does not request one.
pub const DEFAULT_TEMPLATE: &str = "root";

const TEMPLATE_EXTENSIONS: &[&str] = &["liquid", "html"];

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("templates root not found: {0}")]
    NotFound(PathBuf),
    #[error("no template named {0:?}")]
    Missing(String),
    #[error("template name {name:?} used by both {first} and {second}")]
    Duplicate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("failed to compile template {path}: {message}")]
    Compile { path: PathBuf, message: String },
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Template execution failed.
#[derive(Error, Debug)]
#[error("template {template:?} failed to render {page}: {message}")]
pub struct RenderError {
    pub template: String,
    pub page: String,
    pub message: String,
}

/// A compiled template that renders one page to bytes.
///
/// Shared read-only across the build's worker threads.
pub trait Template: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, page: &PageContext<'_>) -> Result<Vec<u8>, RenderError>;
}

/// Liquid template; the page is exposed as the global `page`.
pub struct LiquidTemplate {
    name: String,
    template: liquid::Template,
}

#[derive(Serialize)]
struct Globals<'a> {
    page: &'a PageContext<'a>,
}

impl Template for LiquidTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, page: &PageContext<'_>) -> Result<Vec<u8>, RenderError> {
        let fail = |message: String| RenderError {
            template: self.name.clone(),
            page: page.path.to_string(),
            message,
        };
        let globals = liquid::to_object(&Globals { page }).map_err(|e| fail(e.to_string()))?;
        let rendered = self
            .template
            .render(&globals)
            .map_err(|e| fail(e.to_string()))?;
        Ok(rendered.into_bytes())
    }
}

/// Loaded templates, keyed by name.
#[derive(Default)]
pub struct TemplatePool {
    templates: BTreeMap<String, Box<dyn Template>>,
}

impl TemplatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: Box<dyn Template>) {
        self.templates.insert(template.name().to_string(), template);
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Result<&dyn Template, TemplateError> {
        self.templates
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| TemplateError::Missing(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Template name requested by a page's metadata.
pub fn resolve_template_name(page: &Page) -> &str {
    template_name(&page.meta)
}

fn template_name(meta: &Meta) -> &str {
    meta::get_str(meta, "template")
        .or_else(|| meta::get_str(meta, "Template"))
        .unwrap_or(DEFAULT_TEMPLATE)
}

struct Source {
    name: String,
    rel: String,
    path: PathBuf,
    text: String,
}

/// Compile every template under `dir`.
pub fn load_templates(dir: &Path) -> Result<TemplatePool, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::NotFound(dir.to_path_buf()));
    }

    let sources = collect_sources(dir)?;

    let mut partials = InMemorySource::new();
    for source in &sources {
        partials.add(source.rel.clone(), source.text.clone());
        if let Some(without_ext) = strip_extension(&source.rel) {
            partials.add(without_ext, source.text.clone());
        }
    }
    let parser = liquid::ParserBuilder::with_stdlib()
        .partials(EagerCompiler::new(partials))
        .build()
        .map_err(|e| TemplateError::Compile {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut pool = TemplatePool::new();
    for source in sources {
        let template = parser
            .parse(&source.text)
            .map_err(|e| TemplateError::Compile {
                path: source.path.clone(),
                message: e.to_string(),
            })?;
        debug!("template {} from {}", source.name, source.path.display());
        pool.insert(Box::new(LiquidTemplate {
            name: source.name,
            template,
        }));
    }
    Ok(pool)
}

fn collect_sources(dir: &Path) -> Result<Vec<Source>, TemplateError> {
    let mut sources: Vec<Source> = Vec::new();
    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !naming::is_ignored(e.path().strip_prefix(dir).unwrap_or(e.path())));

    for entry in walker {
        let entry = entry.map_err(|e| TemplateError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: std::io::Error::from(e),
        })?;
        if !entry.file_type().is_file() || !is_template_file(entry.path()) {
            continue;
        }
        let path = entry.path().to_path_buf();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(first) = seen.get(&name) {
            return Err(TemplateError::Duplicate {
                name,
                first: first.clone(),
                second: path,
            });
        }
        let text = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        let rel = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");

        seen.insert(name.clone(), path.clone());
        sources.push(Source {
            name,
            rel,
            path,
            text,
        });
    }
    Ok(sources)
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e.as_str()))
}

fn strip_extension(rel: &str) -> Option<String> {
    let (head, _ext) = rel.rsplit_once('.')?;
    if head.is_empty() || head.ends_with('/') {
        None
    } else {
        Some(head.to_string())
    }
}
