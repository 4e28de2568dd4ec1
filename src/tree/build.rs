//! Control tree builder.
//!
//! Walks the named children of a body node and classifies each one through
//! the grammar's table, recursing into loop bodies, branches and cases.
//! Constructs nested deeper than `MAX_NESTING` are skipped with a warning.

use tracing::{trace, warn};

use super::{slice, NodeKind, Outline, SummaryNode, SyntaxNode, TreeWarning};
use crate::parser::{CaseValue, Category, Grammar};

/// Branch tag for nodes produced from an `if` consequence.
pub const BRANCH_TRUE: &str = "true";
/// Branch tag for nodes produced from an `if` alternative.
pub const BRANCH_FALSE: &str = "false";
/// Branch tag for a case without a match expression.
pub const DEFAULT_CASE: &str = "default";
/// Deepest construct the builder descends into.
pub const MAX_NESTING: usize = 256;

const ALTERNATIVE_FIELD: &str = "alternative";
const BODY_FIELD: &str = "body";
const VALUE_FIELD: &str = "value";
const EMPTY_STATEMENT: &str = "empty_statement";

/// Summarize the statements below `node`.
pub fn build<N: SyntaxNode>(node: N, source: &[u8], grammar: &Grammar) -> Outline {
    let mut builder = TreeBuilder::new(source, grammar);
    let nodes = builder.build(node);
    Outline {
        nodes,
        warnings: builder.into_warnings(),
    }
}

/// Shared state for one traversal: the source, the grammar, the current
/// nesting depth and the warnings collected so far.
pub(crate) struct TreeBuilder<'a> {
    source: &'a [u8],
    grammar: &'a Grammar,
    depth: usize,
    warnings: Vec<TreeWarning>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a [u8], grammar: &'a Grammar) -> Self {
        Self {
            source,
            grammar,
            depth: 0,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub(crate) fn into_warnings(self) -> Vec<TreeWarning> {
        self.warnings
    }

    pub(crate) fn text<N: SyntaxNode>(&self, node: N) -> String {
        slice(self.source, node.start_byte(), node.end_byte())
    }

    /// Text from the start of the first node to the end of the last one.
    pub(crate) fn span_text<N: SyntaxNode>(&self, nodes: &[N]) -> Option<String> {
        let start = nodes.iter().map(|n| n.start_byte()).min()?;
        let end = nodes.iter().map(|n| n.end_byte()).max()?;
        Some(slice(self.source, start, end))
    }

    /// Look up a required field, recording a warning when it is absent.
    pub(crate) fn field<N: SyntaxNode>(&mut self, node: N, field: &str) -> Option<N> {
        let child = node.child_by_field_name(field);
        if child.is_none() {
            self.missing(node, field);
        }
        child
    }

    pub(crate) fn missing<N: SyntaxNode>(&mut self, node: N, field: &str) {
        let warning = TreeWarning::missing_field(node, field);
        warn!(
            node_kind = %warning.node_kind,
            field = %warning.field,
            start_byte = warning.start_byte,
            "skipping construct: {}",
            warning
        );
        self.warnings.push(warning);
    }

    /// Run `f` one level deeper, or skip `node` once the nesting cap is hit.
    fn descend<N: SyntaxNode, T>(
        &mut self,
        node: N,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Option<T> {
        if self.depth >= MAX_NESTING {
            let warning = TreeWarning::too_deep(node);
            warn!(
                node_kind = %warning.node_kind,
                start_byte = warning.start_byte,
                "skipping construct: {}",
                warning
            );
            self.warnings.push(warning);
            return None;
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        Some(result)
    }

    /// Summaries for every named child of `node`, in source order.
    pub(crate) fn build<N: SyntaxNode>(&mut self, node: N) -> Vec<SummaryNode> {
        let mut nodes = Vec::new();
        for child in node.named_children() {
            self.classify(child, &mut nodes);
        }
        nodes
    }

    fn classify<N: SyntaxNode>(&mut self, child: N, out: &mut Vec<SummaryNode>) {
        let Some(category) = self.grammar.classify(child.kind()) else {
            trace!(kind = child.kind(), "unhandled node kind");
            return;
        };

        self.descend(child, |builder| builder.summarize(child, category, out));
    }

    fn summarize<N: SyntaxNode>(
        &mut self,
        child: N,
        category: Category,
        out: &mut Vec<SummaryNode>,
    ) {
        let summary = match category {
            Category::Block => {
                let nodes = self.build(child);
                out.extend(nodes);
                return;
            }
            Category::Instruction => Some(SummaryNode::instruction(self.text(child))),
            Category::For { header } => self.for_loop(child, header),
            Category::While { condition } => {
                self.test_loop(child, NodeKind::While, condition, true)
            }
            Category::DoWhile { condition } => {
                self.test_loop(child, NodeKind::DoWhile, condition, false)
            }
            Category::Conditional { condition } => self.conditional(child, condition, Vec::new()),
            Category::Switch { condition } => self.switch(child, condition),
            Category::Case { value } => Some(self.case(child, value)),
        };

        out.extend(summary);
    }

    /// Summaries for a loop body: a block is flattened, a single statement
    /// is classified on its own.
    fn loop_body<N: SyntaxNode>(&mut self, body: N) -> Vec<SummaryNode> {
        let mut nodes = Vec::new();
        self.classify(body, &mut nodes);
        nodes
    }

    fn for_loop<N: SyntaxNode>(&mut self, node: N, header: &[&str]) -> Option<SummaryNode> {
        // JavaScript marks an empty header part with an `empty_statement`,
        // and a part's trailing `;` token shares its field
        let parts: Vec<N> = header
            .iter()
            .filter_map(|field| {
                node.children_by_field_name(field)
                    .into_iter()
                    .find(|part| part.is_named() && part.kind() != EMPTY_STATEMENT)
            })
            .collect();
        let tag = self.span_text(&parts).unwrap_or_default();
        let body = self.field(node, BODY_FIELD)?;

        Some(
            SummaryNode::new(NodeKind::For)
                .with_branch_tag(tag)
                .with_children(self.loop_body(body)),
        )
    }

    fn test_loop<N: SyntaxNode>(
        &mut self,
        node: N,
        kind: NodeKind,
        condition: &str,
        unwrap: bool,
    ) -> Option<SummaryNode> {
        let test = self.field(node, condition)?;
        let test = if unwrap { unwrap_parenthesized(test) } else { test };
        let tag = self.text(test);
        let body = self.field(node, BODY_FIELD)?;

        Some(
            SummaryNode::new(kind)
                .with_branch_tag(tag)
                .with_children(self.loop_body(body)),
        )
    }

    /// An `if` node. Consequence results are tagged `"true"`, alternative
    /// results `"false"`.
    ///
    /// `inherited` holds alternatives that belong to this node but are stored
    /// on its parent (Python's `elif` chain).
    fn conditional<N: SyntaxNode>(
        &mut self,
        node: N,
        condition: &str,
        inherited: Vec<N>,
    ) -> Option<SummaryNode> {
        let test = self.field(node, condition)?;
        let text = self.text(unwrap_parenthesized(test));

        let mut alternatives = node.children_by_field_name(ALTERNATIVE_FIELD);

        let mut consequence = Vec::new();
        for child in node.named_children() {
            if alternatives.iter().any(|alt| alt.id() == child.id()) {
                continue;
            }
            self.classify(child, &mut consequence);
        }

        alternatives.extend(inherited);
        let alternative = self.alternatives(alternatives);

        let children = tagged(consequence, BRANCH_TRUE)
            .chain(tagged(alternative, BRANCH_FALSE))
            .collect();

        Some(
            SummaryNode::new(NodeKind::If)
                .with_text(text)
                .with_children(children),
        )
    }

    /// Summaries for the alternative branches of a conditional.
    ///
    /// A leading alternative that is itself a conditional (Python `elif`)
    /// becomes a nested `if` that owns the remaining alternatives.
    fn alternatives<N: SyntaxNode>(&mut self, alternatives: Vec<N>) -> Vec<SummaryNode> {
        let mut alternatives = alternatives.into_iter();
        let Some(first) = alternatives.next() else {
            return Vec::new();
        };

        if let Some(Category::Conditional { condition }) = self.grammar.classify(first.kind()) {
            let rest: Vec<N> = alternatives.collect();
            return self
                .descend(first, |builder| builder.conditional(first, condition, rest))
                .flatten()
                .into_iter()
                .collect();
        }

        let mut nodes = self.build(first);
        for alternative in alternatives {
            nodes.extend(self.build(alternative));
        }
        nodes
    }

    fn switch<N: SyntaxNode>(&mut self, node: N, condition: &str) -> Option<SummaryNode> {
        let test = self.field(node, condition)?;
        let text = self.text(unwrap_parenthesized(test));

        Some(
            SummaryNode::new(NodeKind::Switch)
                .with_text(text)
                .with_children(self.build(node)),
        )
    }

    fn case<N: SyntaxNode>(&mut self, node: N, value: CaseValue) -> SummaryNode {
        let values: Vec<N> = match value {
            CaseValue::Field(field) => node.child_by_field_name(field).into_iter().collect(),
            CaseValue::Kind(kind) => node
                .named_children()
                .into_iter()
                .filter(|child| child.kind() == kind)
                .collect(),
        };
        let tag = self
            .span_text(&values)
            .unwrap_or_else(|| DEFAULT_CASE.to_string());

        SummaryNode::new(NodeKind::Case)
            .with_branch_tag(tag)
            .with_children(self.build(node))
    }
}

/// Strip the parentheses around a test expression.
///
/// C++ wraps tests in a `condition_clause` with a `value` field; C and
/// JavaScript use a `parenthesized_expression` without fields; Python tests
/// are bare.
fn unwrap_parenthesized<N: SyntaxNode>(node: N) -> N {
    if let Some(value) = node.child_by_field_name(VALUE_FIELD) {
        return value;
    }
    if node.kind() == "parenthesized_expression" {
        if let Some(inner) = node
            .named_children()
            .into_iter()
            .find(|child| child.kind() != "comment")
        {
            return inner;
        }
    }
    node
}

/// Overwrite the branch tag of every node.
fn tagged(nodes: Vec<SummaryNode>, tag: &str) -> impl Iterator<Item = SummaryNode> + '_ {
    nodes.into_iter().map(move |node| node.with_branch_tag(tag))
}
