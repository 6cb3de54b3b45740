//! CLI output formatting for the load and build stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every page leads with
//! its positional index and title; its path, template and file counts follow
//! as indented context lines. The tree follows the computed navigation, so
//! the output doubles as a preview of the site structure.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Pages
//! 001 Home → /
//!     Template: root
//!     2 contents, 1 asset
//!     001 Blog → /blog
//!         Template: list
//!         1 content
//!
//! 2 pages
//! ```
//!
//! ## Build
//!
//! ```text
//! Skipped
//!     /drafts (no template "draft")
//!
//! Built 2 pages, skipped 1, copied 3 assets → out
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::BuildReport;
use crate::sitemap::Site;
use crate::template;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

// ============================================================================
// Load output
// ============================================================================

/// Format the loaded site as a navigation tree.
///
/// Pages without a parent (the root, or orphans whose parent directory is not
/// a page) start their own top-level branch.
pub fn format_load_output(site: &Site) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];

    let tops: Vec<usize> = (0..site.len())
        .filter(|&i| site.page(i).nav.parent.is_none())
        .collect();
    for (pos, &idx) in tops.iter().enumerate() {
        format_page_tree(site, idx, pos + 1, 0, &mut lines);
    }

    lines.push(String::new());
    lines.push(count(site.len(), "page"));
    lines
}

fn format_page_tree(site: &Site, idx: usize, position: usize, depth: usize, lines: &mut Vec<String>) {
    let page = site.page(idx);
    let pad = indent(depth);
    lines.push(format!(
        "{pad}{} {} → {}",
        format_index(position),
        page.title,
        page.path
    ));
    lines.push(format!(
        "{pad}    Template: {}",
        template::resolve_template_name(page)
    ));

    let mut counts = Vec::new();
    if !page.contents.is_empty() {
        counts.push(count(page.contents.len(), "content"));
    }
    if !page.assets.is_empty() {
        counts.push(count(page.assets.len(), "asset"));
    }
    if !counts.is_empty() {
        lines.push(format!("{pad}    {}", counts.join(", ")));
    }

    for (pos, &child) in page.nav.children.iter().enumerate() {
        format_page_tree(site, child, pos + 1, depth + 1, lines);
    }
}

/// Print load output to stdout.
pub fn print_load_output(site: &Site) {
    for line in format_load_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the build summary: skipped pages first, then totals.
pub fn format_build_output(report: &BuildReport, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for (path, template) in &report.skipped {
            lines.push(format!("    {path} (no template {template:?})"));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Built {}, skipped {}, copied {} → {}",
        count(report.built, "page"),
        report.skipped.len(),
        count(report.assets, "asset"),
        output_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport, output_dir: &Path) {
    for line in format_build_output(report, output_dir) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::build_sitemap;
    use crate::test_helpers::*;
    use serde_json::json;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(1, "page"), "1 page");
        assert_eq!(count(0, "page"), "0 pages");
        assert_eq!(count(3, "asset"), "3 assets");
    }

    #[test]
    fn load_output_follows_nav_tree() {
        let mut pages = pages_at(&["/", "/blog", "/blog/first-post", "/about"]);
        pages[0].contents.push("<p>hi</p>".into());
        pages[1].meta.insert("template".into(), json!("list"));
        pages[2].assets.push("/blog/first-post/cover.jpg".into());
        let site = build_sitemap(pages);

        let lines = format_load_output(&site);
        assert_eq!(
            lines,
            vec![
                "Pages",
                "001 Home → /",
                "    Template: root",
                "    1 content",
                "    001 Blog → /blog",
                "        Template: list",
                "        001 First Post → /blog/first-post",
                "            Template: root",
                "            1 asset",
                "    002 About → /about",
                "        Template: root",
                "",
                "4 pages",
            ]
        );
    }

    #[test]
    fn load_output_lists_orphans_at_top_level() {
        let site = build_sitemap(pages_at(&["/", "/x/y"]));
        let lines = format_load_output(&site);
        assert!(lines.contains(&"001 Home → /".to_string()));
        assert!(lines.contains(&"002 Y → /x/y".to_string()));
    }

    #[test]
    fn build_output_without_skips() {
        let report = BuildReport {
            built: 3,
            skipped: vec![],
            assets: 1,
        };
        assert_eq!(
            format_build_output(&report, Path::new("out")),
            vec!["Built 3 pages, skipped 0, copied 1 asset → out"]
        );
    }

    #[test]
    fn build_output_lists_skipped_pages() {
        let report = BuildReport {
            built: 1,
            skipped: vec![("/x".into(), "nonexistent".into())],
            assets: 0,
        };
        let lines = format_build_output(&report, Path::new("site/out"));
        assert_eq!(lines[0], "Skipped");
        assert_eq!(lines[1], "    /x (no template \"nonexistent\")");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Built 1 page, skipped 1, copied 0 assets → site/out");
    }
}
