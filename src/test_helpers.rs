//! Shared test utilities for the pagr test suite.
//!
//! Provides fixture builders and lookup helpers that work with loader and
//! sitemap data structures (`Page`, `Site`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = nested_fixture(3);
//! let pages = load(tmp.path()).unwrap();
//!
//! let page = find_page(&pages, "/d1/d2");
//! assert_eq!(page_paths(&pages), vec!["/", "/d1", "/d1/d2", "/d1/d2/d3"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::Page;
use chrono::DateTime;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
}

/// A chain of `depth` nested directories (`d1/d2/...`) under a root.
///
/// The root carries `defaults.toml` with `inherited = "yes"`. Every
/// directory, root included, gets a `meta.toml` with `own = <page path>`,
/// one `body.txt` and one `asset.png`.
pub fn nested_fixture(depth: usize) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "defaults.toml", "inherited = \"yes\"\n");

    let mut rel = String::new();
    for level in 0..=depth {
        if level > 0 {
            if !rel.is_empty() {
                rel.push('/');
            }
            rel.push_str(&format!("d{level}"));
        }
        let page_path = format!("/{rel}");
        let prefix = if rel.is_empty() {
            String::new()
        } else {
            format!("{rel}/")
        };
        write_file(
            tmp.path(),
            &format!("{prefix}meta.toml"),
            &format!("own = \"{page_path}\"\n"),
        );
        write_file(
            tmp.path(),
            &format!("{prefix}body.txt"),
            &format!("Level {level}\n"),
        );
        write_file(tmp.path(), &format!("{prefix}asset.png"), "png");
    }
    tmp
}

/// Bare pages for the given paths, in the given order.
pub fn pages_at(paths: &[&str]) -> Vec<Page> {
    paths
        .iter()
        .map(|p| Page::new(p, DateTime::UNIX_EPOCH))
        .collect()
}

// =========================================================================
// Lookups: panics with a clear message on miss
// =========================================================================

/// Find a page by path. Panics if not found.
pub fn find_page<'a>(pages: &'a [Page], path: &str) -> &'a Page {
    pages.iter().find(|p| p.path == path).unwrap_or_else(|| {
        let paths = page_paths(pages);
        panic!("page '{path}' not found. Available: {paths:?}")
    })
}

/// All page paths in slice order.
pub fn page_paths(pages: &[Page]) -> Vec<&str> {
    pages.iter().map(|p| p.path.as_str()).collect()
}

/// Paths of the pages behind a list of arena indices.
pub fn paths_of<'a>(pages: &'a [Page], indices: &[usize]) -> Vec<&'a str> {
    indices.iter().map(|&i| pages[i].path.as_str()).collect()
}
