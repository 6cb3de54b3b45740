//! Content loading: one [`Page`] per directory under the content root.
//!
//! Stage 1 of the pagr build pipeline. Walks the content root in lexical
//! filename order and classifies every file it meets:
//!
//! ```text
//! content/                         # Content root → page "/"
//! ├── defaults.toml                # Cascades to "/" and everything below
//! ├── welcome.md                   # Body of "/"
//! ├── blog/                        # Page "/blog"
//! │   ├── defaults.yaml            # Cascades to "/blog" and below
//! │   ├── meta.toml                # Explicit metadata for "/blog"
//! │   ├── intro.txt                # Body, converted line by line
//! │   └── cover.jpg                # Asset "/blog/cover.jpg" (image)
//! └── drafts.ignore/               # Skipped with everything beneath it
//! ```
//!
//! ## Metadata precedence
//!
//! Explicit page metadata (`meta.*`, `page.*`) always wins. Defaults are then
//! applied from the page's own directory outward to the root, each layer
//! filling only the keys still missing, so nearer defaults beat farther ones.
//!
//! ## Errors
//!
//! Every error is fatal: a malformed data file or unconvertible body aborts
//! the whole load and no partial page set is returned.

use crate::content::{self, ContentError};
use crate::data::{self, DataError};
use crate::meta::{self, Meta};
use crate::naming::{self, FileRole};
use crate::types::Page;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("content root not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseFailure },
    #[error("IO error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Why a metadata or content file could not be read.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Directory path → merged defaults declared in that directory.
type DefaultsTable = BTreeMap<String, Meta>;

/// Load every page under `root`, sorted by path.
pub fn load(root: &Path) -> Result<Vec<Page>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::NotFound(root.to_path_buf()));
    }

    let mut pages: BTreeMap<String, Page> = BTreeMap::new();
    let mut defaults = DefaultsTable::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !naming::is_ignored(relative(root, e.path())));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            LoadError::Io {
                path,
                source: io::Error::from(e),
            }
        })?;
        let rel = relative(root, entry.path());

        if entry.file_type().is_dir() {
            let page_path = page_path(rel);
            let updated = latest_modification(entry.path())?;
            debug!("page {page_path}");
            pages.insert(page_path.clone(), Page::new(&page_path, updated));
            continue;
        }

        let owner = page_path(rel.parent().unwrap_or(Path::new("")));
        let Some(page) = pages.get_mut(&owner) else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy();

        match naming::classify(&file_name) {
            FileRole::Defaults(_) => {
                let found = read_data(entry.path())?;
                debug!("defaults {} for {owner}", rel.display());
                meta::merge_owned(defaults.entry(owner).or_default(), found, false);
            }
            FileRole::PageMeta(_) => {
                let found = read_data(entry.path())?;
                debug!("meta {} for {owner}", rel.display());
                meta::merge_owned(&mut page.meta, found, true);
            }
            FileRole::Content(kind) => {
                let bytes = fs::read(entry.path()).map_err(|source| LoadError::Io {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                let html = content::convert(kind, bytes).map_err(|e| LoadError::Parse {
                    path: entry.path().to_path_buf(),
                    source: e.into(),
                })?;
                debug!("content {} ({kind:?}) for {owner}", rel.display());
                page.contents.push(html);
            }
            FileRole::Asset => {
                let asset = page_path(rel);
                debug!("asset {asset}");
                page.assets.push(asset);
            }
        }
    }

    for page in pages.values_mut() {
        cascade_defaults(page, &defaults);
    }

    Ok(pages.into_values().collect())
}

/// Fill missing keys from the page's own directory outward to the root.
fn cascade_defaults(page: &mut Page, defaults: &DefaultsTable) {
    for dir in ancestors(&page.path) {
        if let Some(layer) = defaults.get(dir) {
            meta::merge(&mut page.meta, layer, false);
        }
    }
}

/// `"/a/b"` → `["/a/b", "/a", "/"]`; `"/"` → `["/"]`.
fn ancestors(path: &str) -> Vec<&str> {
    let mut chain = vec![path];
    let mut current = path;
    while current != "/" {
        current = match current.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &current[..idx],
        };
        chain.push(current);
    }
    chain
}

fn read_data(path: &Path) -> Result<Meta, LoadError> {
    data::load_data_file(path).map_err(|e| match e {
        DataError::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => LoadError::Parse {
            path: path.to_path_buf(),
            source: other.into(),
        },
    })
}

fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Root-relative filesystem path → `/`-rooted posix path.
fn page_path(rel: &Path) -> String {
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Latest mtime among `dir` and its immediate children.
fn latest_modification(dir: &Path) -> Result<DateTime<Utc>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut latest = modified(dir).map_err(io_err)?;
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if let Ok(time) = modified(&entry.path()) {
            latest = latest.max(time);
        }
    }
    Ok(DateTime::<Utc>::from(latest))
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
