//! Shared types used across all pipeline stages.
//!
//! [`Page`] is produced by the loader, receives its [`Nav`] from the sitemap
//! builder, and is read (never mutated) by the build stage. Navigation is
//! stored as indices into the [`Site`](crate::sitemap::Site) arena, so a page
//! never owns another page.
//!
//! [`PageContext`] is the render-time, serializable view handed to templates.

use crate::meta::Meta;
use chrono::{DateTime, SecondsFormat, Utc};
use mime_guess::mime;
use serde::Serialize;

/// One node of the site tree: a content directory.
#[derive(Debug, Clone)]
pub struct Page {
    /// Last path segment; empty for the root
    pub slug: String,
    /// Absolute posix path rooted at `/`
    pub path: String,
    /// Display title derived from the slug (dashes → spaces, capitalized)
    pub title: String,
    pub meta: Meta,
    /// Converted HTML bodies, in filename order
    pub contents: Vec<String>,
    pub assets: Assets,
    pub nav: Nav,
    /// Latest mtime of the directory and its immediate children
    pub updated: DateTime<Utc>,
}

impl Page {
    pub fn new(path: &str, updated: DateTime<Utc>) -> Self {
        Self {
            slug: crate::naming::slug_from_path(path),
            path: path.to_string(),
            title: crate::naming::title_from_path(path),
            meta: Meta::new(),
            contents: Vec::new(),
            assets: Assets::default(),
            nav: Nav::default(),
            updated,
        }
    }
}

/// Navigation links, as indices into the site's page arena.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nav {
    pub all: Vec<usize>,
    pub root: Option<usize>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub crumbs: Vec<usize>,
}

/// Media family of an asset, guessed from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Misc,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Self {
        match mime_guess::from_path(path).first() {
            Some(m) if m.type_() == mime::IMAGE => AssetKind::Image,
            Some(m) if m.type_() == mime::VIDEO => AssetKind::Video,
            Some(m) if m.type_() == mime::AUDIO => AssetKind::Audio,
            _ => AssetKind::Misc,
        }
    }
}

/// Page assets: a flat list plus the same paths split by media family.
///
/// Paths are content-root-relative with a leading `/`, e.g. `/blog/cover.jpg`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Assets {
    pub all: Vec<String>,
    pub image: Vec<String>,
    pub video: Vec<String>,
    pub audio: Vec<String>,
    pub misc: Vec<String>,
}

impl Assets {
    pub fn push(&mut self, path: String) {
        let bucket = match AssetKind::from_path(&path) {
            AssetKind::Image => &mut self.image,
            AssetKind::Video => &mut self.video,
            AssetKind::Audio => &mut self.audio,
            AssetKind::Misc => &mut self.misc,
        };
        bucket.push(path.clone());
        self.all.push(path);
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Render-time view of a page.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub slug: &'a str,
    pub path: &'a str,
    pub title: &'a str,
    pub meta: &'a Meta,
    pub contents: &'a [String],
    pub assets: &'a Assets,
    pub updated: String,
    pub nav: NavContext<'a>,
}

/// Nav with every index expanded into a [`PageSummary`].
#[derive(Debug, Default, Serialize)]
pub struct NavContext<'a> {
    pub root: Option<PageSummary<'a>>,
    pub parent: Option<PageSummary<'a>>,
    pub children: Vec<PageSummary<'a>>,
    pub crumbs: Vec<PageSummary<'a>>,
    pub all: Vec<PageSummary<'a>>,
}

/// A linked page as seen from another page's nav. Carries no nav of its own.
#[derive(Debug, Serialize)]
pub struct PageSummary<'a> {
    pub slug: &'a str,
    pub path: &'a str,
    pub title: &'a str,
    pub meta: &'a Meta,
    pub updated: String,
}

impl<'a> PageSummary<'a> {
    pub fn of(page: &'a Page) -> Self {
        Self {
            slug: &page.slug,
            path: &page.path,
            title: &page.title,
            meta: &page.meta,
            updated: format_timestamp(&page.updated),
        }
    }
}

/// RFC 3339, second precision, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
