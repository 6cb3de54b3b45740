//! End-to-end builds through the public API: load → sitemap → templates → build.

use pagr::config::Config;
use pagr::generate::{BuildDirs, BuildError, BuildReport, build_all};
use pagr::{scan, sitemap, template};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn build(config: &Config) -> Result<BuildReport, BuildError> {
    let mut pages = scan::load(&config.content).unwrap();
    sitemap::sort_by_updated(&mut pages);
    let site = sitemap::build_sitemap(pages);
    let pool = template::load_templates(&config.templates).unwrap();
    build_all(
        &site,
        &pool,
        &BuildDirs {
            content: &config.content,
            assets: &config.assets,
            output: &config.output,
        },
    )
}

/// Relative path → bytes for every file under `dir`.
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

const PAGE_TEMPLATE: &str = "\
<title>{{ page.meta.site }} | {{ page.title }}</title>
{% for crumb in page.nav.crumbs %}<a href=\"{{ crumb.path }}\">{{ crumb.title }}</a>{% endfor %}
{% for c in page.contents %}{{ c }}{% endfor %}
{% for a in page.assets.image %}<img src=\"{{ a }}\">{% endfor %}
";

/// Root plus `depth` nested directories, each with meta, content and an image.
fn nested_site(depth: usize) -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "content/defaults.toml", "site = \"Example\"\n");
    let mut rel = String::from("content");
    for level in 0..=depth {
        if level > 0 {
            rel.push_str(&format!("/level-{level}"));
        }
        write(root, &format!("{rel}/meta.yaml"), &format!("own: {level}\n"));
        write(root, &format!("{rel}/body.md"), &format!("Level **{level}**\n"));
        write(root, &format!("{rel}/pic.png"), "not really a png");
    }
    write(root, "templates/root.liquid", PAGE_TEMPLATE);
    write(root, "assets/css/site.css", "body { margin: 0 }");
    let config = Config::default_in(root);
    (tmp, config)
}

#[test]
fn builds_nested_tree() {
    let (tmp, config) = nested_site(5);
    let report = build(&config).unwrap();

    assert_eq!(report.built, 6);
    assert!(report.skipped.is_empty());
    assert_eq!(report.assets, 6 + 1);

    let out = tmp.path().join("out");
    let deepest = "level-1/level-2/level-3/level-4/level-5";
    let html = fs::read_to_string(out.join(deepest).join("index.html")).unwrap();
    assert!(html.contains("<title>Example | Level 5</title>"));
    assert!(html.contains("<strong>5</strong>"));
    assert!(html.contains(&format!("<img src=\"/{deepest}/pic.png\">")));
    assert!(html.contains("<a href=\"/level-1\">Level 1</a>"));
    assert_eq!(html.matches("<a href=").count(), 5);

    let home = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(home.contains("<title>Example | Home</title>"));

    assert!(out.join(deepest).join("pic.png").is_file());
    assert!(out.join("assets/css/site.css").is_file());
}

#[test]
fn rebuild_is_byte_identical() {
    let (tmp, config) = nested_site(3);
    build(&config).unwrap();
    let first = snapshot(&tmp.path().join("out"));
    build(&config).unwrap();
    let second = snapshot(&tmp.path().join("out"));

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn missing_template_is_skipped() {
    let (tmp, config) = nested_site(2);
    write(
        tmp.path(),
        "content/level-1/meta.yaml",
        "own: 1\ntemplate: nonexistent\n",
    );

    let report = build(&config).unwrap();
    assert_eq!(report.built, 2);
    assert_eq!(
        report.skipped,
        vec![("/level-1".to_string(), "nonexistent".to_string())]
    );
    let out = tmp.path().join("out");
    assert!(!out.join("level-1/index.html").exists());
    assert!(out.join("level-1/level-2/index.html").is_file());
}

#[test]
fn render_failure_aborts_build() {
    let (tmp, config) = nested_site(1);
    write(
        tmp.path(),
        "templates/root.liquid",
        "{{ page.title | divided_by: 0 }}",
    );
    assert!(matches!(build(&config), Err(BuildError::Render(_))));
}

#[test]
fn ignored_content_is_not_built() {
    let (tmp, config) = nested_site(1);
    write(tmp.path(), "content/drafts.ignore/body.txt", "secret");
    write(tmp.path(), "content/level-1/old.ignore.png", "old");

    let report = build(&config).unwrap();
    assert_eq!(report.built, 2);
    let out = tmp.path().join("out");
    assert!(!out.join("drafts.ignore").exists());
    assert!(!out.join("level-1/old.ignore.png").exists());
}

#[test]
fn per_page_templates() {
    let (tmp, config) = nested_site(1);
    write(tmp.path(), "content/level-1/meta.yaml", "own: 1\nTemplate: leaf\n");
    write(
        tmp.path(),
        "templates/layouts/leaf.html",
        "leaf of {{ page.nav.parent.title }}",
    );

    build(&config).unwrap();
    let html = fs::read_to_string(tmp.path().join("out/level-1/index.html")).unwrap();
    assert_eq!(html, "leaf of Home");
}
