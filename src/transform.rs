//! Entry points: source text in, control-structure outline out.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::parser::{self, Grammar, TreeError};
use crate::tree::{self, Outline, SummaryNode, TreeWarning};

/// Parse `source` with the grammar for `selector` and summarize every function.
///
/// Unsupported selectors fail before any parsing happens.
pub fn transform(selector: &str, source: &[u8]) -> Result<Outline, TreeError> {
    let grammar = parser::for_selector(selector)
        .ok_or_else(|| TreeError::UnsupportedLanguage(selector.to_string()))?;
    transform_with(grammar, source)
}

/// Parse `source` with a known grammar and summarize every function.
pub fn transform_with(grammar: &Grammar, source: &[u8]) -> Result<Outline, TreeError> {
    let tree = parser::parse(grammar, source)?;
    let root = tree.root_node();
    if root.has_error() {
        debug!(language = grammar.name, "source has syntax errors, continuing");
    }

    let outline = tree::locate(root, source, grammar);
    debug!(
        language = grammar.name,
        functions = outline.nodes.len(),
        warnings = outline.warnings.len(),
        "built outline"
    );
    Ok(outline)
}

/// Outline of one file on disk.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutline {
    pub path: String,
    pub language: String,
    pub nodes: Vec<SummaryNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TreeWarning>,
}

/// Resolve the grammar for a file: explicit selector first, then extension.
pub fn grammar_for(path: &Path, selector: Option<&str>) -> Result<&'static Grammar, TreeError> {
    if let Some(selector) = selector {
        return parser::for_selector(selector)
            .ok_or_else(|| TreeError::UnsupportedLanguage(selector.to_string()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parser::for_extension(ext).ok_or_else(|| TreeError::UnsupportedLanguage(format!(".{}", ext)))
}

/// Outline a single file.
pub fn transform_file(path: &Path, selector: Option<&str>) -> anyhow::Result<FileOutline> {
    let grammar = grammar_for(path, selector)?;
    let source =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let outline = transform_with(grammar, &source)
        .with_context(|| format!("failed to outline {}", path.display()))?;

    Ok(FileOutline {
        path: path.to_string_lossy().to_string(),
        language: grammar.name.to_string(),
        nodes: outline.nodes,
        warnings: outline.warnings,
    })
}

/// Outline multiple files in parallel.
///
/// Uses rayon for parallel processing. Files that fail are logged and
/// left out. Results are sorted by path.
pub fn transform_files(paths: &[PathBuf], selector: Option<&str>) -> Vec<FileOutline> {
    let results: Vec<_> = paths
        .par_iter()
        .map(|p| transform_file(p, selector))
        .collect();

    let mut outlines = Vec::new();
    for result in results {
        match result {
            Ok(outline) => outlines.push(outline),
            Err(e) => warn!("skipping file: {:#}", e),
        }
    }

    // Sort by path for deterministic ordering
    outlines.sort_by(|a, b| a.path.cmp(&b.path));
    outlines
}
