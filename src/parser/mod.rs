//! Grammar profiles and tree-sitter parsing.
//!
//! This module provides:
//! - `Grammar`: per-language profile describing which node kinds are
//!   functions and how every other node kind is classified
//! - Registry lookups by request selector (`"c"`, `"cpp"`, ...) and by file extension
//! - `parse`: source bytes to a tree-sitter tree

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;
use tree_sitter::{Language, Parser as TsParser};

pub mod languages;

/// Errors raised before or while parsing.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("language not available: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("failed to parse {0} source")]
    ParseFailed(&'static str),
}

/// How a function's signature text is sliced out of the source.
#[derive(Debug, Clone, Copy)]
pub enum Signature {
    /// A single field covering the whole signature (C family `declarator`).
    Field(&'static str),
    /// From the first present field to the last present one (e.g. `name`..`parameters`).
    Span(&'static [&'static str]),
}

/// Control-structure category of a node kind, with the fields it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Grouping block; its children are spliced into the parent sequence.
    Block,
    /// Leaf statement; its full text is kept.
    Instruction,
    /// Loop whose header is the span over the listed fields.
    For { header: &'static [&'static str] },
    /// Loop with a leading test.
    While { condition: &'static str },
    /// Loop with a trailing test. The condition text is kept as written.
    DoWhile { condition: &'static str },
    /// Conditional with consequence and optional alternatives.
    Conditional { condition: &'static str },
    /// Multi-way dispatch.
    Switch { condition: &'static str },
    /// One arm of a dispatch. A missing value marks the default arm.
    Case { value: CaseValue },
}

/// Where a dispatch arm keeps its match expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseValue {
    /// A single field (C `value`).
    Field(&'static str),
    /// Every named child of this kind, as one span (Python `case_pattern`).
    Kind(&'static str),
}

/// Maps one node kind to its category.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: &'static str,
    pub category: Category,
}

impl Rule {
    pub const fn new(kind: &'static str, category: Category) -> Self {
        Self { kind, category }
    }
}

/// Per-language profile consumed by the locator and builder.
pub struct Grammar {
    /// Language name (e.g. "python").
    pub name: &'static str,
    /// Request selectors accepted for this grammar.
    pub selectors: &'static [&'static str],
    /// File extensions handled (without dot).
    pub extensions: &'static [&'static str],
    /// Loads the tree-sitter language.
    pub language: fn() -> Language,
    /// Node kinds that define or declare a function.
    pub functions: &'static [&'static str],
    /// How function signatures are sliced.
    pub signature: Signature,
    /// Field holding a function's body.
    pub body_field: &'static str,
    /// Classification table for statements inside bodies.
    pub rules: &'static [Rule],
}

impl Grammar {
    /// Category for a node kind, if it is in the classification table.
    pub fn classify(&self, kind: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| rule.kind == kind)
            .map(|rule| rule.category)
    }

    /// Whether a node kind defines or declares a function.
    pub fn is_function(&self, kind: &str) -> bool {
        self.functions.contains(&kind)
    }

    /// Check if this grammar handles the given file extension.
    pub fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&ext)
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar").field("name", &self.name).finish()
    }
}

static SELECTORS: Lazy<HashMap<&'static str, &'static Grammar>> = Lazy::new(|| {
    languages::ALL
        .iter()
        .flat_map(|grammar| grammar.selectors.iter().map(move |s| (*s, *grammar)))
        .collect()
});

static EXTENSIONS: Lazy<HashMap<&'static str, &'static Grammar>> = Lazy::new(|| {
    languages::ALL
        .iter()
        .flat_map(|grammar| grammar.extensions.iter().map(move |e| (*e, *grammar)))
        .collect()
});

/// Get the grammar for a request selector.
/// Returns None if the selector is not supported.
pub fn for_selector(selector: &str) -> Option<&'static Grammar> {
    SELECTORS.get(selector).copied()
}

/// Get the grammar for a file extension (without dot).
/// Returns None if no grammar handles the extension.
pub fn for_extension(ext: &str) -> Option<&'static Grammar> {
    EXTENSIONS.get(ext).copied()
}

/// Return all supported request selectors, sorted.
pub fn selectors() -> Vec<&'static str> {
    let mut selectors: Vec<_> = SELECTORS.keys().copied().collect();
    selectors.sort_unstable();
    selectors
}

/// Parse source code with a fresh parser for the grammar.
///
/// Syntax errors do not fail the parse; tree-sitter returns a best-effort
/// tree with ERROR nodes, which the builders simply do not recognize.
pub fn parse(grammar: &Grammar, source: &[u8]) -> Result<tree_sitter::Tree, TreeError> {
    let mut parser = TsParser::new();
    parser.set_language(&(grammar.language)())?;
    parser
        .parse(source, None)
        .ok_or(TreeError::ParseFailed(grammar.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        assert_eq!(selectors(), vec!["c", "cpp", "javascript", "python"]);
        assert_eq!(for_selector("cpp").map(|g| g.name), Some("cpp"));
        assert!(for_selector("cobol").is_none());
        // Selectors are exact.
        assert!(for_selector("C").is_none());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(for_extension("h").map(|g| g.name), Some("c"));
        assert_eq!(for_extension("hpp").map(|g| g.name), Some("cpp"));
        assert_eq!(for_extension("mjs").map(|g| g.name), Some("javascript"));
        assert_eq!(for_extension("py").map(|g| g.name), Some("python"));
        assert!(for_extension("rs").is_none());
    }

    #[test]
    fn test_every_grammar_loads() {
        for grammar in languages::ALL {
            let tree = parse(grammar, b"").unwrap();
            assert_eq!(tree.root_node().named_child_count(), 0, "{}", grammar.name);
        }
    }

    #[test]
    fn test_classify_is_exact() {
        let c = languages::c::GRAMMAR.classify("compound_statement");
        assert_eq!(c, Some(Category::Block));
        assert_eq!(languages::c::GRAMMAR.classify("try_statement"), None);
        assert!(languages::c::GRAMMAR.is_function("function_definition"));
    }
}
