use crate::dom::dom_model::DomNode;

/// Depth-first, pre-order walk over a tree. Children are visited left to
/// right. Uses a heap stack, so depth is bounded only by memory.
pub struct PreOrder<'a> {
    stack: Vec<&'a DomNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the leftmost child is popped first.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl DomNode {
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Call `visitor` once for every node under `root`, root included.
pub fn traverse<'a, F>(root: &'a DomNode, mut visitor: F)
where
    F: FnMut(&'a DomNode),
{
    for node in root.iter() {
        visitor(node);
    }
}
