//! Centralized filename conventions.
//!
//! Every file under the content root is classified by its stem and extension:
//!
//! ```text
//! defaults.toml / default.json     → directory defaults (cascade to descendants)
//! meta.yaml / page.toml            → explicit page metadata
//! *.txt *.html *.md *.gfm *.cm     → page content
//! anything else                    → asset
//! ```
//!
//! A single leading dot on the stem is tolerated, so `.defaults.json` and
//! `.page.toml` are read the same way as their visible counterparts.
//!
//! Any path containing [`IGNORE_MARKER`] is excluded from loading, template
//! discovery and asset copying.

use crate::content::ContentKind;
use crate::data::DataFormat;
use std::path::Path;

/// Paths containing this token are skipped everywhere.
pub const IGNORE_MARKER: &str = ".ignore";

const DEFAULTS_STEMS: &[&str] = &["defaults", "default"];
const PAGE_META_STEMS: &[&str] = &["meta", "page"];

/// What a file under the content root is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Defaults(DataFormat),
    PageMeta(DataFormat),
    Content(ContentKind),
    Asset,
}

/// Classify a file by name.
///
/// - `"defaults.toml"` → `Defaults(Toml)`
/// - `".page.json"` → `PageMeta(Json)`
/// - `"body.md"` → `Content(Markdown)`
/// - `"data.json"` → `Asset` (data files only count under a metadata stem)
/// - `"photo.png"` → `Asset`
pub fn classify(file_name: &str) -> FileRole {
    let path = Path::new(file_name);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = stem.strip_prefix('.').unwrap_or(&stem);

    if let Some(format) = DataFormat::from_ext(&ext) {
        if DEFAULTS_STEMS.contains(&stem) {
            return FileRole::Defaults(format);
        }
        if PAGE_META_STEMS.contains(&stem) {
            return FileRole::PageMeta(format);
        }
    }
    match ContentKind::from_ext(&ext) {
        Some(kind) => FileRole::Content(kind),
        None => FileRole::Asset,
    }
}

/// Whether a path (usually root-relative) contains the ignore marker.
pub fn is_ignored(path: &Path) -> bool {
    path.to_string_lossy().contains(IGNORE_MARKER)
}

/// Display title for a page path.
///
/// - `"/"` → `"Home"`
/// - `"/my-first-post"` → `"My First Post"`
/// - `"/notes/draft.v2"` → `"Draft"` (extension-like suffix dropped)
pub fn title_from_path(page_path: &str) -> String {
    let last = page_path.rsplit('/').find(|s| !s.is_empty());
    let Some(last) = last else {
        return "Home".to_string();
    };
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| last.to_string());

    stem.split('-')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last non-empty segment of a page path; empty for the root.
pub fn slug_from_path(page_path: &str) -> String {
    page_path
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_files() {
        assert_eq!(classify("defaults.toml"), FileRole::Defaults(DataFormat::Toml));
        assert_eq!(classify("default.json"), FileRole::Defaults(DataFormat::Json));
        assert_eq!(classify(".defaults.yml"), FileRole::Defaults(DataFormat::Yaml));
    }

    #[test]
    fn page_meta_files() {
        assert_eq!(classify("meta.toml"), FileRole::PageMeta(DataFormat::Toml));
        assert_eq!(classify("page.yaml"), FileRole::PageMeta(DataFormat::Yaml));
        assert_eq!(classify(".page.toml"), FileRole::PageMeta(DataFormat::Toml));
    }

    #[test]
    fn content_files() {
        assert_eq!(classify("body0.txt"), FileRole::Content(ContentKind::Text));
        assert_eq!(classify("index.html"), FileRole::Content(ContentKind::Html));
        assert_eq!(classify("post.md"), FileRole::Content(ContentKind::Markdown));
        assert_eq!(classify("x.gfm"), FileRole::Content(ContentKind::GithubMarkdown));
        assert_eq!(classify("x.cm"), FileRole::Content(ContentKind::CommonMark));
    }

    #[test]
    fn metadata_stem_with_content_extension_is_content() {
        assert_eq!(classify("meta.md"), FileRole::Content(ContentKind::Markdown));
    }

    #[test]
    fn other_files_are_assets() {
        assert_eq!(classify("image.png"), FileRole::Asset);
        assert_eq!(classify("data.json"), FileRole::Asset);
        assert_eq!(classify("defaults"), FileRole::Asset);
        assert_eq!(classify("Makefile"), FileRole::Asset);
    }

    #[test]
    fn ignore_marker_anywhere_in_path() {
        assert!(is_ignored(Path::new("drafts.ignore/post.md")));
        assert!(is_ignored(Path::new("a/notes.ignore.txt")));
        assert!(is_ignored(Path::new("a/b.txt.ignore")));
        assert!(!is_ignored(Path::new("a/ignore/b.txt")));
    }

    #[test]
    fn title_for_root() {
        assert_eq!(title_from_path("/"), "Home");
    }

    #[test]
    fn title_dashes_become_spaces() {
        assert_eq!(title_from_path("/blog/my-first-post"), "My First Post");
    }

    #[test]
    fn title_drops_extension_like_suffix() {
        assert_eq!(title_from_path("/notes/draft.v2"), "Draft");
    }

    #[test]
    fn slug_is_last_segment() {
        assert_eq!(slug_from_path("/"), "");
        assert_eq!(slug_from_path("/a"), "a");
        assert_eq!(slug_from_path("/a/b-c"), "b-c");
    }
}
