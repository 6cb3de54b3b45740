//! Project configuration module.
//!
//! Handles loading and validating the project config file. The config names
//! the four directories a build works with and the worker thread cap.
//!
//! ## Config File Location
//!
//! Pass the file with `--config`. Without it, `pagr.toml` in the current
//! directory is used when present; otherwise every key takes its default,
//! relative to the current directory.
//!
//! ```text
//! site/
//! ├── pagr.toml                # Project config
//! ├── content/                 # Pages, metadata, page assets
//! ├── templates/               # Liquid templates
//! ├── assets/                  # Copied as-is to out/assets/
//! └── out/                     # Build output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content = "content"       # Content root
//! templates = "templates"   # Template root
//! assets = ["assets"]       # Directories copied verbatim into the output
//! output = "out"            # Output directory
//! threads = 4               # Max worker threads (omit for auto = CPU cores)
//! ```
//!
//! The file may also be JSON (`.json`) or YAML (`.yaml`, `.yml`) with the
//! same keys. Relative paths are resolved against the directory holding the
//! config file. Unknown keys are rejected to catch typos early.

use crate::data::DataFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pagr.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration.
///
/// All fields have defaults; a config file needs only the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Content root: one page per directory.
    pub content: PathBuf,
    /// Template root: `.liquid` and `.html` files.
    pub templates: PathBuf,
    /// Directories copied into the output, each under its own name.
    pub assets: Vec<PathBuf>,
    /// Output directory.
    pub output: PathBuf,
    /// Maximum number of worker threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            templates: PathBuf::from("templates"),
            assets: vec![PathBuf::from("assets")],
            output: PathBuf::from("out"),
            threads: None,
        }
    }
}

impl Config {
    /// Defaults, resolved against `dir`.
    pub fn default_in(dir: &Path) -> Self {
        let mut config = Self::default();
        config.resolve_paths(dir);
        config
    }

    /// Join every relative path onto `base`.
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.content);
        resolve(&mut self.templates);
        resolve(&mut self.output);
        self.assets.iter_mut().for_each(resolve);
    }

    /// Validate directory relationships and the thread cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content == self.output {
            return Err(ConfigError::Validation(
                "content and output must be different directories".into(),
            ));
        }
        if self.output.starts_with(&self.content) {
            return Err(ConfigError::Validation(
                "output must not be inside the content directory".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Validation(
                "threads must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &Config) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.threads.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse config text; the format comes from `path`'s extension.
fn parse_config(path: &Path, text: &str) -> Result<Config, ConfigError> {
    let format = path
        .extension()
        .and_then(|e| DataFormat::from_ext(&e.to_string_lossy()))
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let config: Config = match format {
        DataFormat::Toml => toml::from_str(text)?,
        DataFormat::Json => serde_json::from_str(text)?,
        DataFormat::Yaml if text.trim().is_empty() => Config::default(),
        DataFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(config)
}

/// Load, resolve and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path)?;
    let mut config = parse_config(path, &text)?;
    let base = path.parent().unwrap_or(Path::new(""));
    config.resolve_paths(base);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `pagr.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagr Configuration
# ==================
#
# All options are optional. The values below are the defaults.
# Relative paths are resolved against the directory holding this file.

# Content root. Every directory below it becomes a page:
#   defaults.{toml,json,yaml}  metadata inherited by the directory and below
#   meta.{toml,json,yaml}      metadata for this page only
#   *.txt *.html *.md *.gfm *.cm  page content, in filename order
#   anything else              page asset, copied next to the page
# Paths containing ".ignore" are skipped.
content = "content"

# Template root. Each .liquid or .html file is a template named by its file
# stem. Pages pick one with the "template" metadata key (default: "root").
templates = "templates"

# Directories copied verbatim into the output, each under its own name.
# Missing directories are skipped with a warning.
assets = ["assets"]

# Output directory. Must not be the content root or inside it.
output = "out"

# Maximum number of worker threads.
# Omit for auto (one per CPU core). Larger values are clamped to the core count.
# threads = 4
"##
}
