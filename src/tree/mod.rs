//! Control-structure summaries derived from tree-sitter parse trees.
//!
//! This module provides:
//! - `SyntaxNode`: the read-only node capability the builders are written against
//! - `SummaryNode`: the output tree (functions, branches, loops, dispatch, statements)
//! - `locate`: finds every function in a parse tree and summarizes its body
//! - `build`: summarizes the statements below a single body node
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Source text │────▶│ tree-sitter  │────▶│ Function     │────▶│ Outline     │
//! └─────────────┘     │ (per grammar)│     │ Locator      │     │ (nodes,     │
//!                     └──────────────┘     └──────┬───────┘     │  warnings)  │
//!                                                 │ body        └─────────────┘
//!                                                 ▼
//!                                          ┌──────────────┐
//!                                          │ Control Tree │
//!                                          │ Builder      │
//!                                          └──────────────┘
//! ```
//!
//! The builders never look at grammar-specific types. Everything they know
//! about node kinds and field names comes from a `parser::Grammar` profile.

mod build;
mod locate;
mod node;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

pub use build::{build, BRANCH_FALSE, BRANCH_TRUE, DEFAULT_CASE, MAX_NESTING};
pub use locate::locate;
pub use node::SyntaxNode;

/// Kind of a summary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Function,
    If,
    Switch,
    Case,
    For,
    While,
    DoWhile,
    Instruction,
    /// Reserved for exception handling. Never produced.
    Try,
}

impl NodeKind {
    /// Convert to the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Function => "function",
            NodeKind::If => "if",
            NodeKind::Switch => "switch",
            NodeKind::Case => "case",
            NodeKind::For => "for",
            NodeKind::While => "while",
            NodeKind::DoWhile => "doWhile",
            NodeKind::Instruction => "instruction",
            NodeKind::Try => "try",
        }
    }

    /// Leaf kinds never carry children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Instruction)
    }

    /// Loop kinds keep their governing expression in the branch tag.
    pub fn is_loop(&self) -> bool {
        matches!(self, NodeKind::For | NodeKind::While | NodeKind::DoWhile)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of the control-structure tree.
///
/// `text` holds the function signature, the test expression of an `if` or
/// `switch`, or the statement of an `instruction`. `branch_tag` holds a loop's
/// governing expression, a case's match expression, or `"true"`/`"false"` for
/// nodes produced directly under an `if`. The branch tag of an `if` child
/// replaces whatever the child carried before, loop headers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryNode {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub branch_tag: Option<String>,
    pub children: Vec<SummaryNode>,
}

impl SummaryNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: None,
            branch_tag: None,
            children: Vec::new(),
        }
    }

    /// A function node with its signature and summarized body.
    pub fn function(signature: impl Into<String>, children: Vec<SummaryNode>) -> Self {
        Self::new(NodeKind::Function)
            .with_text(signature)
            .with_children(children)
    }

    /// A leaf statement.
    pub fn instruction(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Instruction).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_branch_tag(mut self, tag: impl Into<String>) -> Self {
        self.branch_tag = Some(tag.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SummaryNode>) -> Self {
        self.children = children;
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn branch_tag(&self) -> &str {
        self.branch_tag.as_deref().unwrap_or("")
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SummaryNode::size).sum::<usize>()
    }
}

/// Wire format: `{"type", "data", "condition", "nodes"}`.
///
/// Unset text fields serialize as empty strings. `nodes` is `null` for
/// leaves and an array for every other kind.
impl Serialize for SummaryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SummaryNode", 4)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("data", self.text())?;
        state.serialize_field("condition", self.branch_tag())?;
        if self.kind.is_leaf() {
            state.serialize_field("nodes", &None::<Vec<SummaryNode>>)?;
        } else {
            state.serialize_field("nodes", &self.children)?;
        }
        state.end()
    }
}

/// Why a construct was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A matched construct lacks a field it needs.
    MissingField,
    /// A construct sits deeper than `MAX_NESTING` levels.
    TooDeep,
}

/// A construct that was skipped while building the outline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeWarning {
    pub kind: WarningKind,
    /// Node kind of the skipped construct (e.g. "if_statement").
    pub node_kind: String,
    /// Field that could not be resolved. Empty for `TooDeep`.
    pub field: String,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl TreeWarning {
    pub fn missing_field<N: SyntaxNode>(node: N, field: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingField,
            node_kind: node.kind().to_string(),
            field: field.into(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }

    pub fn too_deep<N: SyntaxNode>(node: N) -> Self {
        Self {
            kind: WarningKind::TooDeep,
            node_kind: node.kind().to_string(),
            field: String::new(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }
}

impl fmt::Display for TreeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::MissingField => write!(
                f,
                "{} at bytes {}..{} has no `{}` field, skipped",
                self.node_kind, self.start_byte, self.end_byte, self.field
            ),
            WarningKind::TooDeep => write!(
                f,
                "{} at bytes {}..{} is nested more than {} levels deep, skipped",
                self.node_kind, self.start_byte, self.end_byte, MAX_NESTING
            ),
        }
    }
}

/// Function summaries for one source text, plus anything that was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Outline {
    pub nodes: Vec<SummaryNode>,
    pub warnings: Vec<TreeWarning>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Slice source bytes into an owned string, lossily.
///
/// Out-of-range spans yield an empty string.
pub(crate) fn slice(source: &[u8], start: usize, end: usize) -> String {
    source
        .get(start..end)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}
