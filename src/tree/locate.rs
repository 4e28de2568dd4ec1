//! Function locator.

use super::build::TreeBuilder;
use super::{Outline, SummaryNode, SyntaxNode};
use crate::parser::{Grammar, Signature};

/// Find every function below `root` and summarize its body.
///
/// The scan is a pre-order walk over the whole tree, so functions nested in
/// other functions (or in classes, or in expressions) are emitted as
/// independent siblings in source order. A function without a resolvable
/// signature or body is skipped with a warning; its subtree is still scanned.
pub fn locate<N: SyntaxNode>(root: N, source: &[u8], grammar: &Grammar) -> Outline {
    let mut builder = TreeBuilder::new(source, grammar);
    let mut functions = Vec::new();

    // Explicit stack: parse trees can nest far deeper than the thread stack.
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if grammar.is_function(node.kind()) {
            if let Some(function) = summarize(&mut builder, node) {
                functions.push(function);
            }
        }
        pending.extend(node.named_children().into_iter().rev());
    }

    Outline {
        nodes: functions,
        warnings: builder.into_warnings(),
    }
}

fn summarize<N: SyntaxNode>(builder: &mut TreeBuilder<'_>, node: N) -> Option<SummaryNode> {
    let signature = signature(builder, node)?;
    let body_field = builder.grammar().body_field;
    let body = builder.field(node, body_field)?;
    let children = builder.build(body);

    Some(SummaryNode::function(signature, children))
}

fn signature<N: SyntaxNode>(builder: &mut TreeBuilder<'_>, node: N) -> Option<String> {
    match builder.grammar().signature {
        Signature::Field(field) => {
            let declarator = builder.field(node, field)?;
            Some(builder.text(declarator))
        }
        Signature::Span(fields) => {
            let parts: Vec<N> = fields
                .iter()
                .filter_map(|field| node.child_by_field_name(field))
                .collect();
            let text = builder.span_text(&parts);
            if text.is_none() {
                builder.missing(node, &fields.join("|"));
            }
            text
        }
    }
}
