//! In-memory parse tree for exercising the builders without a grammar.

use super::SyntaxNode;

struct FakeData {
    kind: &'static str,
    start: usize,
    end: usize,
    children: Vec<(Option<&'static str>, usize)>,
}

/// A tree whose nodes are located in `source` by their text.
///
/// Every node is named; fields are attached per child.
pub(crate) struct FakeTree {
    source: String,
    nodes: Vec<FakeData>,
}

impl FakeTree {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn source(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Add a node spanning the first occurrence of `text`.
    pub(crate) fn node(
        &mut self,
        kind: &'static str,
        text: &str,
        children: &[(Option<&'static str>, usize)],
    ) -> usize {
        let start = self
            .source
            .find(text)
            .unwrap_or_else(|| panic!("{text:?} not in source"));
        self.nodes.push(FakeData {
            kind,
            start,
            end: start + text.len(),
            children: children.to_vec(),
        });
        self.nodes.len() - 1
    }

    pub(crate) fn leaf(&mut self, kind: &'static str, text: &str) -> usize {
        self.node(kind, text, &[])
    }

    pub(crate) fn get(&self, index: usize) -> FakeNode<'_> {
        FakeNode { tree: self, index }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct FakeNode<'a> {
    tree: &'a FakeTree,
    index: usize,
}

impl FakeNode<'_> {
    fn data(&self) -> &FakeData {
        &self.tree.nodes[self.index]
    }
}

impl SyntaxNode for FakeNode<'_> {
    fn kind(&self) -> &str {
        self.data().kind
    }

    fn is_named(&self) -> bool {
        true
    }

    fn id(&self) -> usize {
        self.index
    }

    fn start_byte(&self) -> usize {
        self.data().start
    }

    fn end_byte(&self) -> usize {
        self.data().end
    }

    fn named_child_count(&self) -> usize {
        self.data().children.len()
    }

    fn named_child(&self, index: usize) -> Option<Self> {
        self.data()
            .children
            .get(index)
            .map(|(_, child)| self.tree.get(*child))
    }

    fn child_by_field_name(&self, field: &str) -> Option<Self> {
        self.children_by_field_name(field).into_iter().next()
    }

    fn children_by_field_name(&self, field: &str) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .filter(|(name, _)| *name == Some(field))
            .map(|(_, child)| self.tree.get(*child))
            .collect()
    }
}
