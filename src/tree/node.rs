//! Read-only parse tree node capability.

/// A node of a parse tree, as seen by the locator and builder.
///
/// Implemented for `tree_sitter::Node`. Child iteration only sees named
/// children, but a field can resolve to an anonymous token like `;`.
pub trait SyntaxNode: Copy {
    /// The grammar's type tag (e.g. "if_statement").
    fn kind(&self) -> &str;

    /// False for anonymous tokens such as `(` or `;`.
    fn is_named(&self) -> bool;

    /// Identity within one tree.
    fn id(&self) -> usize;

    /// Start byte offset (0-indexed).
    fn start_byte(&self) -> usize;

    /// End byte offset (0-indexed, exclusive).
    fn end_byte(&self) -> usize;

    fn named_child_count(&self) -> usize;

    fn named_child(&self, index: usize) -> Option<Self>;

    /// First child stored under `field`.
    fn child_by_field_name(&self, field: &str) -> Option<Self>;

    /// Every child stored under `field`, in source order.
    fn children_by_field_name(&self, field: &str) -> Vec<Self>;

    fn named_children(&self) -> Vec<Self> {
        (0..self.named_child_count())
            .filter_map(|i| self.named_child(i))
            .collect()
    }
}

impl<'tree> SyntaxNode for tree_sitter::Node<'tree> {
    fn kind(&self) -> &str {
        tree_sitter::Node::kind(self)
    }

    fn is_named(&self) -> bool {
        tree_sitter::Node::is_named(self)
    }

    fn id(&self) -> usize {
        tree_sitter::Node::id(self)
    }

    fn start_byte(&self) -> usize {
        tree_sitter::Node::start_byte(self)
    }

    fn end_byte(&self) -> usize {
        tree_sitter::Node::end_byte(self)
    }

    fn named_child_count(&self) -> usize {
        tree_sitter::Node::named_child_count(self)
    }

    fn named_child(&self, index: usize) -> Option<Self> {
        tree_sitter::Node::named_child(self, index)
    }

    fn child_by_field_name(&self, field: &str) -> Option<Self> {
        tree_sitter::Node::child_by_field_name(self, field)
    }

    fn children_by_field_name(&self, field: &str) -> Vec<Self> {
        let mut cursor = self.walk();
        tree_sitter::Node::children_by_field_name(self, field, &mut cursor).collect()
    }
}
