//! # pagr
//!
//! A static site generator that turns a directory tree into a website.
//! Your filesystem is the data source: every directory becomes a page, files
//! inside it supply metadata, content and assets, and a pool of Liquid
//! templates turns each page into HTML.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Load      content/   →  Vec<Page>     (filesystem → pages, metadata cascaded)
//! 2. Sitemap   Vec<Page>  →  Site          (arena + navigation graph)
//! 3. Build     Site       →  out/          (templates rendered, assets copied)
//! ```
//!
//! Each stage is a plain function over owned data, so tests can exercise any
//! stage on hand-built input without running the ones before it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content root, one page per directory, cascades defaults |
//! | [`sitemap`] | Stage 2: the `Site` arena; root, parent, children, crumbs per page |
//! | [`generate`] | Stage 3: renders pages in parallel, writes `index.html`, copies assets |
//! | [`template`] | Template trait, Liquid templates, pool loading and name resolution |
//! | [`content`] | Content dispatch by extension: text, HTML, three markdown dialects |
//! | [`data`] | TOML / JSON / YAML metadata files into [`meta::Meta`] |
//! | [`meta`] | Metadata map and the overwrite-or-keep merge |
//! | [`naming`] | Filename classification, ignore marker, display titles |
//! | [`copy`] | mtime-preserving file and directory copy |
//! | [`types`] | Shared types: `Page`, `Nav`, `Assets`, the render context |
//! | [`config`] | Project config loading, path resolution and validation |
//! | [`output`] | CLI output formatting, tree display of load and build results |
//!
//! # Design Decisions
//!
//! ## Directories Are Pages
//!
//! A page is a directory, not a file. Everything a page needs (several
//! content fragments, images, metadata) sits next to each other, and the URL
//! of a page is simply its directory path.
//!
//! ## Navigation As Indices
//!
//! Pages refer to each other through indices into the [`sitemap::Site`]
//! arena rather than references. The arena is built once and never resized,
//! so nav data can be computed in parallel and handed to templates without
//! any ownership cycle.
//!
//! ## Missing Templates Skip, Everything Else Aborts
//!
//! A page asking for a template that does not exist is skipped with a
//! warning; the rest of the site still builds. Any other failure stops the
//! build at the first error.
//!
//! ## Idempotent Output
//!
//! Rendering is deterministic (metadata is key-ordered) and copied assets keep
//! their source mtime, so building an unchanged tree twice yields identical
//! files and the second build copies nothing.

pub mod config;
pub mod content;
pub mod copy;
pub mod data;
pub mod generate;
pub mod meta;
pub mod naming;
pub mod output;
pub mod scan;
pub mod sitemap;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
