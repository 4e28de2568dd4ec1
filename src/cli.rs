//! Command-line interface for codetree.

use clap::{Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ServerConfig;
use crate::parser::{self, Grammar};
use crate::report;
use crate::server::Server;
use crate::transform;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Config template written by `codetree init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/codetree.yaml");

/// Control-structure summaries of source code.
///
/// Codetree finds every function in a source file and reduces its body to
/// the statements that shape control flow: branches, loops, dispatch and
/// the plain instructions between them.
#[derive(Parser)]
#[command(name = "codetree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve POST /tree/{language} over HTTP
    Serve(ServeArgs),
    /// Print the control tree of a file or directory
    Tree(TreeArgs),
    /// Write a commented server config file
    Init(InitArgs),
}

/// Arguments for the serve command.
#[derive(Parser)]
pub struct ServeArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Largest accepted request body, in bytes
    #[arg(long)]
    pub max_body_size: Option<usize>,
}

/// Arguments for the tree command.
#[derive(Parser)]
pub struct TreeArgs {
    /// File or directory to summarize
    pub path: PathBuf,

    /// Language selector (default: from file extension)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Glob of paths to skip (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codetree.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(max_body_size) = self.max_body_size {
            config.max_body_size = max_body_size;
        }
    }
}

/// Run the serve command. Returns only if the listener fails.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<i32> {
    let mut config = match ServerConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };
    args.apply(&mut config);

    let server = Server::bind(config)?;
    server.run()?;
    Ok(EXIT_SUCCESS)
}

/// Build a glob set from exclusion patterns.
pub fn exclusion_set(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid exclude pattern {:?}: {}", pattern, e))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect source files below `root`.
///
/// Hidden, vendor and `node_modules` directories are skipped. With a forced
/// grammar only its extensions are collected; otherwise any extension a
/// grammar handles. Exclusions match paths relative to `root`.
pub fn collect_files(
    root: &Path,
    forced: Option<&Grammar>,
    excluded: &GlobSet,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories, but not the root itself
            if e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir() && (name == "vendor" || name == "node_modules") {
                return false;
            }
            let relative = e.path().strip_prefix(root).unwrap_or(e.path());
            !excluded.is_match(relative)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let wanted = match forced {
            Some(grammar) => grammar.handles_extension(ext),
            None => parser::for_extension(ext).is_some(),
        };
        if wanted {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Run the tree command.
pub fn run_tree(args: &TreeArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Validate language
    let forced = match args.lang.as_deref() {
        Some(selector) => match parser::for_selector(selector) {
            Some(grammar) => Some(grammar),
            None => {
                eprintln!(
                    "Error: language not available: {} (supported: {})",
                    selector,
                    parser::selectors().join(", ")
                );
                return Ok(EXIT_ERROR);
            }
        },
        None => None,
    };

    let excluded = match exclusion_set(&args.exclude) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Collect files to summarize
    let files = if metadata.is_dir() {
        collect_files(&args.path, forced, &excluded)?
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to summarize");
        return Ok(EXIT_SUCCESS);
    }

    let outlines = transform::transform_files(&files, forced.map(|g| g.selectors[0]));

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&path_str, files.len(), &outlines)?,
        _ => report::write_pretty(&path_str, files.len(), &outlines),
    }

    // Files that could not be read or parsed were logged and left out
    if outlines.len() < files.len() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite or --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to adjust host, port and CORS", args.output.display());
    println!("  2. Run: codetree serve --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
