//! Output formatting for `codetree tree`.
//!
//! Supports two output formats:
//! - Pretty: indented, colored tree for reading in a terminal
//! - JSON: per-file outlines for programmatic consumption

use std::fmt::Write as _;

use colored::*;
use serde::Serialize;

use crate::transform::FileOutline;
use crate::tree::{NodeKind, SummaryNode};

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report: one entry per file, nodes in the service wire format.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_scanned: usize,
    pub files: &'a [FileOutline],
}

/// Write results in JSON format.
pub fn write_json(
    path: &str,
    files_scanned: usize,
    outlines: &[FileOutline],
) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        files_scanned,
        files: outlines,
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, files_scanned: usize, outlines: &[FileOutline]) {
    print!("{}", render_pretty(path, files_scanned, outlines));
}

/// Render the pretty format into a string.
pub fn render_pretty(path: &str, files_scanned: usize, outlines: &[FileOutline]) -> String {
    let mut out = String::new();

    // Header
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} v{}",
        "codetree".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}{}", "Scanning: ".dimmed(), path);
    let _ = writeln!(out);

    for outline in outlines {
        write_file(&mut out, outline);
    }

    let functions: usize = outlines.iter().map(|o| o.nodes.len()).sum();
    let warnings: usize = outlines.iter().map(|o| o.warnings.len()).sum();
    let _ = write!(
        out,
        "  {}",
        format!(
            "{} function{} in {} of {} file{}",
            functions,
            plural(functions),
            outlines.len(),
            files_scanned,
            plural(files_scanned)
        )
        .dimmed()
    );
    if warnings > 0 {
        let _ = write!(
            out,
            "  {}",
            format!("({} skipped construct{})", warnings, plural(warnings)).yellow()
        );
    }
    let _ = writeln!(out);
    out
}

fn write_file(out: &mut String, outline: &FileOutline) {
    let size: usize = outline.nodes.iter().map(SummaryNode::size).sum();
    let _ = writeln!(
        out,
        "  {} {}",
        outline.path.blue(),
        format!("({}, {} node{})", outline.language, size, plural(size)).dimmed()
    );

    if outline.nodes.is_empty() {
        let _ = writeln!(out, "    {}", "no functions".dimmed());
    }
    for node in &outline.nodes {
        write_node(out, node, 2);
    }

    for warning in &outline.warnings {
        let _ = writeln!(out, "    {} {}", "WARN".yellow(), warning);
    }
    let _ = writeln!(out);
}

fn write_node(out: &mut String, node: &SummaryNode, depth: usize) {
    let _ = write!(out, "{:width$}{}", "", colored_kind(node.kind), width = depth * 2);
    if !node.text().is_empty() {
        let _ = write!(out, " {}", node.text());
    }
    if !node.branch_tag().is_empty() {
        let _ = write!(out, " {}", format!("[{}]", node.branch_tag()).dimmed());
    }
    let _ = writeln!(out);

    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

fn colored_kind(kind: NodeKind) -> ColoredString {
    match kind {
        NodeKind::Function => kind.as_str().cyan().bold(),
        NodeKind::If | NodeKind::Switch | NodeKind::Case => kind.as_str().yellow(),
        NodeKind::Try => kind.as_str().red(),
        _ if kind.is_loop() => kind.as_str().magenta(),
        _ => kind.as_str().normal(),
    }
}

fn plural(count: usize) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}
