//! Navigation graph over the loaded page set.
//!
//! [`build_sitemap`] moves the pages into a [`Site`] arena and fills in every
//! page's [`Nav`] with indices into that arena. The arena is never resized
//! afterwards, so indices stay valid for the life of the `Site`.
//!
//! ```text
//! /               depth 0   root, no parent, crumbs []
//! ├── /blog       depth 1   parent "/",      crumbs [/blog]
//! │   └── /blog/a depth 2   parent "/blog",  crumbs [/blog, /blog/a]
//! └── /about      depth 1   parent "/",      crumbs [/about]
//! ```
//!
//! Nav for each page is computed in parallel against the immutable arena and
//! assigned once every task has finished.

use crate::types::{Nav, NavContext, Page, PageContext, PageSummary, format_timestamp};
use rayon::prelude::*;
use std::collections::HashMap;

/// The stable page arena plus a path index.
#[derive(Debug)]
pub struct Site {
    pages: Vec<Page>,
    index: HashMap<String, usize>,
}

impl Site {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, idx: usize) -> &Page {
        &self.pages[idx]
    }

    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn get(&self, path: &str) -> Option<&Page> {
        self.index_of(path).map(|i| &self.pages[i])
    }

    pub fn root(&self) -> Option<&Page> {
        self.get("/")
    }

    pub fn parent(&self, idx: usize) -> Option<&Page> {
        self.pages[idx].nav.parent.map(|i| &self.pages[i])
    }

    pub fn children(&self, idx: usize) -> Vec<&Page> {
        self.resolve(&self.pages[idx].nav.children)
    }

    pub fn crumbs(&self, idx: usize) -> Vec<&Page> {
        self.resolve(&self.pages[idx].nav.crumbs)
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&Page> {
        indices.iter().map(|&i| &self.pages[i]).collect()
    }

    fn summaries(&self, indices: &[usize]) -> Vec<PageSummary<'_>> {
        indices.iter().map(|&i| PageSummary::of(&self.pages[i])).collect()
    }

    /// Render-time view of the page at `idx`, with nav links expanded.
    pub fn context(&self, idx: usize) -> PageContext<'_> {
        let page = &self.pages[idx];
        let summary = |i: usize| PageSummary::of(&self.pages[i]);

        PageContext {
            slug: &page.slug,
            path: &page.path,
            title: &page.title,
            meta: &page.meta,
            contents: &page.contents,
            assets: &page.assets,
            updated: format_timestamp(&page.updated),
            nav: NavContext {
                root: page.nav.root.map(summary),
                parent: page.nav.parent.map(summary),
                children: self.summaries(&page.nav.children),
                crumbs: self.summaries(&page.nav.crumbs),
                all: self.summaries(&page.nav.all),
            },
        }
    }
}

/// Number of non-empty segments: `"/"` → 0, `"/a/b"` → 2.
pub fn depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// Whether `child` lies strictly below `parent` on a segment boundary.
///
/// `"/a"` contains `"/a/b"` but not `"/ab"` or `"/a"` itself.
pub fn contains(parent: &str, child: &str) -> bool {
    if parent == "/" {
        return child != "/" && child.starts_with('/');
    }
    child
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

/// Stable newest-first ordering by `updated`.
pub fn sort_by_updated(pages: &mut [Page]) {
    pages.sort_by(|a, b| b.updated.cmp(&a.updated));
}

/// Move `pages` into an arena and compute every page's nav.
pub fn build_sitemap(mut pages: Vec<Page>) -> Site {
    let mut index = HashMap::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        index.entry(page.path.clone()).or_insert(i);
    }
    let depths: Vec<usize> = pages.iter().map(|p| depth(&p.path)).collect();
    let root = index.get("/").copied();

    let graph = Graph {
        pages: &pages,
        depths: &depths,
        index: &index,
        root,
    };
    let navs: Vec<Nav> = (0..pages.len())
        .into_par_iter()
        .map(|i| graph.nav_for(i))
        .collect();

    for (page, nav) in pages.iter_mut().zip(navs) {
        page.nav = nav;
    }
    Site { pages, index }
}

/// Read-only view shared by the parallel nav tasks.
struct Graph<'a> {
    pages: &'a [Page],
    depths: &'a [usize],
    index: &'a HashMap<String, usize>,
    root: Option<usize>,
}

impl Graph<'_> {
    fn nav_for(&self, i: usize) -> Nav {
        let path = self.pages[i].path.as_str();
        let d = self.depths[i];

        let parent = match d {
            0 => None,
            1 => self.root,
            _ => self.find_parent(path, d),
        };

        let children = (0..self.pages.len())
            .filter(|&j| self.depths[j] == d + 1 && contains(path, &self.pages[j].path))
            .collect();

        Nav {
            all: (0..self.pages.len()).collect(),
            root: self.root,
            parent,
            children,
            crumbs: self.crumbs(path),
        }
    }

    /// First page, in arena order, one level up whose path contains `path`.
    fn find_parent(&self, path: &str, d: usize) -> Option<usize> {
        (0..self.pages.len())
            .find(|&j| self.depths[j] + 1 == d && contains(&self.pages[j].path, path))
    }

    fn crumbs(&self, path: &str) -> Vec<usize> {
        let mut crumbs = Vec::new();
        let mut prefix = String::with_capacity(path.len());
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
            if let Some(&idx) = self.index.get(&prefix) {
                crumbs.push(idx);
            }
        }
        crumbs
    }
}
