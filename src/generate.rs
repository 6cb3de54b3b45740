//! HTML generation and asset copying.
//!
//! Stage 3 of the pagr build pipeline. Every page of the [`Site`] is matched
//! against the template pool, rendered, and written to
//! `<output>/<page path>/index.html`; its assets are mirrored next to it.
//! Configured asset directories are copied alongside, joined in parallel with
//! the page builds.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── index.html                 # Page "/"
//! ├── blog/
//! │   ├── index.html             # Page "/blog"
//! │   ├── cover.jpg              # Asset "/blog/cover.jpg"
//! │   └── first-post/
//! │       └── index.html         # Page "/blog/first-post"
//! └── assets/                    # Asset root, copied as-is
//!     └── style.css
//! ```
//!
//! ## Failure policy
//!
//! A page whose template is not in the pool is skipped with a warning and
//! listed in the [`BuildReport`]. Any other failure (render, write, copy)
//! aborts the build; files already written are left in place.
//!
//! Page output and asset directories are written concurrently, so a file
//! that both would produce (say `content/assets/site.css` next to an asset
//! root `assets/` holding `site.css`) is rejected before anything is written.

use crate::copy;
use crate::naming;
use crate::sitemap::Site;
use crate::template::{self, RenderError, TemplatePool};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} would be written by both a page and asset directory {root}")]
    Overlap { path: PathBuf, root: PathBuf },
}

/// Source and destination directories for one build.
#[derive(Debug, Clone)]
pub struct BuildDirs<'a> {
    pub content: &'a Path,
    pub assets: &'a [PathBuf],
    pub output: &'a Path,
}

/// Totals for a finished build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages rendered and written
    pub built: usize,
    /// `(page path, requested template)` for every page without a template
    pub skipped: Vec<(String, String)>,
    /// Asset files handled, page assets and asset roots combined
    pub assets: usize,
}

/// An asset directory and the name it is copied under.
struct AssetRoot {
    src: PathBuf,
    name: PathBuf,
}

enum PageOutcome {
    Built { assets: usize },
    Skipped { path: String, template: String },
}

/// Build every page of `site` and copy all assets.
pub fn build_all(
    site: &Site,
    pool: &TemplatePool,
    dirs: &BuildDirs<'_>,
) -> Result<BuildReport, BuildError> {
    fs::create_dir_all(dirs.output).map_err(|source| BuildError::Io {
        path: dirs.output.to_path_buf(),
        source,
    })?;
    let roots = resolve_asset_roots(dirs.assets)?;
    check_overlap(site, &roots, dirs.output)?;
    info!(
        "building {} pages into {}",
        site.len(),
        dirs.output.display()
    );

    let (pages, roots) = rayon::join(
        || {
            (0..site.len())
                .into_par_iter()
                .map(|idx| build_page(site, idx, pool, dirs))
                .collect::<Result<Vec<_>, _>>()
        },
        || copy_asset_roots(&roots, dirs.output),
    );

    let mut report = BuildReport {
        assets: roots?,
        ..BuildReport::default()
    };
    for outcome in pages? {
        match outcome {
            PageOutcome::Built { assets } => {
                report.built += 1;
                report.assets += assets;
            }
            PageOutcome::Skipped { path, template } => report.skipped.push((path, template)),
        }
    }

    info!(
        "built {} pages, skipped {}, {} assets",
        report.built,
        report.skipped.len(),
        report.assets
    );
    Ok(report)
}

fn build_page(
    site: &Site,
    idx: usize,
    pool: &TemplatePool,
    dirs: &BuildDirs<'_>,
) -> Result<PageOutcome, BuildError> {
    let page = site.page(idx);
    let name = template::resolve_template_name(page);
    let Ok(template) = pool.get(name) else {
        warn!("skipping {}: no template named {name:?}", page.path);
        return Ok(PageOutcome::Skipped {
            path: page.path.clone(),
            template: name.to_string(),
        });
    };

    let html = template.execute(&site.context(idx))?;
    let out_file = page_output_path(dirs.output, &page.path);
    write_output(&out_file, &html)?;
    debug!("{} → {}", page.path, out_file.display());

    page.assets
        .all
        .par_iter()
        .try_for_each(|asset| {
            let rel = asset.trim_start_matches('/');
            let src = dirs.content.join(rel);
            copy::copy_file(&src, &dirs.output.join(rel))
                .map(|_| ())
                .map_err(|source| BuildError::Io { path: src, source })
        })?;

    Ok(PageOutcome::Built {
        assets: page.assets.len(),
    })
}

/// `<output>/<page path>/index.html`
pub fn page_output_path(output: &Path, page_path: &str) -> PathBuf {
    output
        .join(page_path.trim_start_matches('/'))
        .join("index.html")
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)
}

/// Name every asset root after its canonical directory. Missing roots are
/// skipped with a warning.
fn resolve_asset_roots(roots: &[PathBuf]) -> Result<Vec<AssetRoot>, BuildError> {
    let mut resolved = Vec::new();
    for root in roots {
        if !root.is_dir() {
            warn!("asset directory {} not found, skipping", root.display());
            continue;
        }
        let src = fs::canonicalize(root).map_err(|source| BuildError::Io {
            path: root.clone(),
            source,
        })?;
        let Some(name) = src.file_name().map(PathBuf::from) else {
            warn!(
                "asset directory {} has no name to copy it under, skipping",
                root.display()
            );
            continue;
        };
        resolved.push(AssetRoot { src, name });
    }
    Ok(resolved)
}

/// Fail if a page's `index.html` or one of its assets lands on a file an
/// asset root also copies.
fn check_overlap(site: &Site, roots: &[AssetRoot], output: &Path) -> Result<(), BuildError> {
    if roots.is_empty() {
        return Ok(());
    }
    for page in site.pages() {
        let index = page_output_path(Path::new(""), &page.path);
        let assets = page
            .assets
            .all
            .iter()
            .map(|asset| PathBuf::from(asset.trim_start_matches('/')));
        for rel in std::iter::once(index).chain(assets) {
            for root in roots {
                let Ok(rest) = rel.strip_prefix(&root.name) else {
                    continue;
                };
                if !naming::is_ignored(rest) && root.src.join(rest).is_file() {
                    return Err(BuildError::Overlap {
                        path: output.join(&rel),
                        root: root.src.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Copy each asset root to `<output>/<root name>/`.
fn copy_asset_roots(roots: &[AssetRoot], output: &Path) -> Result<usize, BuildError> {
    let counts = roots
        .par_iter()
        .map(|root| -> Result<usize, BuildError> {
            let count = copy::copy_dir(&root.src, &output.join(&root.name)).map_err(|source| {
                BuildError::Io {
                    path: root.src.clone(),
                    source,
                }
            })?;
            debug!("copied {count} files from {}", root.src.display());
            Ok(count)
        })
        .collect::<Result<Vec<usize>, BuildError>>()?;
    Ok(counts.into_iter().sum())
}
