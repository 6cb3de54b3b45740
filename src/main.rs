use clap::{Parser, Subcommand};
use log::{LevelFilter, info, warn};
use pagr::config::{self, Config};
use pagr::generate::{self, BuildDirs};
use pagr::sitemap::{self, Site};
use pagr::{output, scan, template};
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pagr")]
#[command(about = "Static site generator: directories become pages, templates make them HTML")]
#[command(long_about = "\
Static site generator: directories become pages, templates make them HTML

Every directory under the content root is one page. Files inside it are
classified by name:

  content/
  ├── defaults.toml        # Metadata inherited by this directory and below
  ├── meta.toml            # Metadata for this page only (wins over defaults)
  ├── intro.txt            # Content: .txt .html .md .gfm .cm, in name order
  ├── logo.png             # Anything else is an asset copied next to the page
  ├── blog/                # Page /blog
  │   └── first-post/      # Page /blog/first-post
  └── drafts.ignore/       # Any path containing .ignore is skipped

Pages render through the template named by their 'template' metadata key,
or 'root' when unset. Pages whose template does not exist are skipped.

Run 'pagr gen-config' to generate a documented pagr.toml.")]
#[command(version)]
struct Cli {
    /// Project config file (.toml, .json, .yaml); defaults to ./pagr.toml if present
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log every page, file and template as it is processed
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and templates, render every page into the output directory
    Build,
    /// Load content and templates and report the site tree without writing
    Check,
    /// Print a stock pagr.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = prepare(cli.config.as_deref(), cli.verbose)?;

            println!("==> Loading {}", config.content.display());
            let site = load_site(&config)?;
            output::print_load_output(&site);

            println!("==> Loading templates from {}", config.templates.display());
            let pool = template::load_templates(&config.templates)?;
            info!("{} templates", pool.len());

            println!("==> Building → {}", config.output.display());
            let report = generate::build_all(
                &site,
                &pool,
                &BuildDirs {
                    content: &config.content,
                    assets: &config.assets,
                    output: &config.output,
                },
            )?;
            output::print_build_output(&report, &config.output);
        }
        Command::Check => {
            let config = prepare(cli.config.as_deref(), cli.verbose)?;

            println!("==> Checking {}", config.content.display());
            let site = load_site(&config)?;
            output::print_load_output(&site);

            let pool = template::load_templates(&config.templates)?;
            let names: Vec<&str> = pool.names().collect();
            println!("Templates: {}", names.join(", "));
            for page in site.pages() {
                let name = template::resolve_template_name(page);
                if pool.get(name).is_err() {
                    warn!("{} requests missing template {name:?}", page.path);
                }
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logging, config and worker pool for the commands that read a project.
fn prepare(config_path: Option<&Path>, verbose: bool) -> Result<Config, config::ConfigError> {
    init_logging(verbose);
    let config = resolve_config(config_path)?;
    init_thread_pool(&config);
    Ok(config)
}

/// Load pages, order them newest first, and compute navigation.
fn load_site(config: &Config) -> Result<Site, scan::LoadError> {
    let mut pages = scan::load(&config.content)?;
    sitemap::sort_by_updated(&mut pages);
    Ok(sitemap::build_sitemap(pages))
}

/// Explicit `--config`, else `./pagr.toml` if present, else defaults.
fn resolve_config(explicit: Option<&Path>) -> Result<Config, config::ConfigError> {
    if let Some(path) = explicit {
        return config::load_config(path);
    }
    let local = Path::new(config::DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return config::load_config(local);
    }
    warn!(
        "no {} found, using defaults",
        config::DEFAULT_CONFIG_FILE
    );
    let config = Config::default_in(Path::new("."));
    config.validate()?;
    Ok(config)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init().ok();
}

/// Initialize the rayon thread pool based on config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(config: &Config) {
    let threads = config::effective_threads(config);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
