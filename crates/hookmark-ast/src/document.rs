//! Arena-backed document tree and depth-first walker.

use crate::node::{Node, NodeId, NodeKind};

/// Signal returned by a walk visitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    /// Descend into children (on enter) and keep walking.
    Continue,
    /// Do not visit the children of the node just entered. The node is
    /// still visited on leave.
    SkipChildren,
    /// Abort the walk without error.
    Stop,
}

/// Parsed document tree.
///
/// Nodes live in a flat arena indexed by [`NodeId`]; the root is always
/// a [`NodeKind::Document`] node. Renderers only read the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    /// Root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena (including detached ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no content below the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Get a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Get a node by id, returning `None` for foreign ids.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access to a node, for building trees by hand.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Kind of the given node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert a new node directly after `sibling` under the same parent.
    pub(crate) fn insert_after(&mut self, sibling: NodeId, kind: NodeKind) -> NodeId {
        let parent = self.nodes[sibling.0].parent.unwrap_or(NodeId(0));
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        self.nodes.push(node);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|&c| c == sibling)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, id);
        id
    }

    /// Replace `old` in its parent's child list with `new`, detaching `old`.
    ///
    /// `new` must already be a descendant of `old`; it is re-parented.
    pub(crate) fn replace_with(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[old.0].parent else {
            return;
        };
        if let Some(slot) = self.nodes[parent.0]
            .children
            .iter_mut()
            .find(|c| **c == old)
        {
            *slot = new;
        }
        self.nodes[old.0].children.retain(|&c| c != new);
        self.nodes[old.0].parent = None;
        self.nodes[new.0].parent = Some(parent);
    }

    /// Raw text content of a node with all markup removed.
    ///
    /// Concatenates text, code span and autolink labels of all descendants.
    /// Line breaks contribute a newline.
    #[must_use]
    pub fn plain_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match &self.node(id).kind {
                NodeKind::Text { literal } | NodeKind::CodeSpan { literal } => {
                    out.push_str(literal);
                }
                NodeKind::AutoLink { label, .. } => out.push_str(label),
                NodeKind::SoftBreak | NodeKind::HardBreak => out.push('\n'),
                _ => stack.extend(self.children(id).iter().rev()),
            }
        }
    }

    /// Walk the subtree rooted at `id` depth-first.
    ///
    /// The visitor is called with `entering = true` before a node's children
    /// and `entering = false` after them. Returning
    /// [`WalkStatus::SkipChildren`] on enter skips the children but still
    /// produces the leave visit. Errors abort the walk immediately.
    pub fn walk<E, F>(&self, id: NodeId, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(NodeId, bool) -> Result<WalkStatus, E>,
    {
        enum Phase {
            Enter,
            Leave,
        }

        let mut stack = vec![(id, Phase::Enter)];
        while let Some((id, phase)) = stack.pop() {
            match phase {
                Phase::Enter => {
                    let status = visitor(id, true)?;
                    if status == WalkStatus::Stop {
                        return Ok(());
                    }
                    stack.push((id, Phase::Leave));
                    if status == WalkStatus::Continue {
                        for &child in self.children(id).iter().rev() {
                            stack.push((child, Phase::Enter));
                        }
                    }
                }
                Phase::Leave => {
                    if visitor(id, false)? == WalkStatus::Stop {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}
