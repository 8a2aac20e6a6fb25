//! DOM Tree (arena-based allocation)

use crate::error::DomError;
use crate::{Node, NodeData, NodeId};

/// Arena-based DOM tree. Node 0 is always the document node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all node IDs in allocation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Allocate a detached node
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.get(child).ok_or(DomError::NodeNotFound(child))?;
        let parent_node = self.get(parent).ok_or(DomError::NodeNotFound(parent))?;
        if matches!(parent_node.data, NodeData::Text(_))
            || matches!(self.nodes[child.index()].data, NodeData::Document | NodeData::ShadowRoot(_))
            || self.inclusive_ancestors(parent).any(|a| a == child)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.unlink(old_parent, child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let node = self.get(child).ok_or(DomError::NodeNotFound(child))?;
        if node.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(parent, child);
        self.nodes[child.index()].parent = None;
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.retain(|&c| c != child);
    }

    /// Children of a node in tree order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    /// The node and its tree ancestors (does not leave a shadow tree)
    pub fn inclusive_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        std::iter::successors(Some(id), |&n| self.get(n).and_then(Node::parent))
    }

    /// Parent in the composed tree: shadow roots continue at their host
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::ShadowRoot(root) => Some(root.host),
            _ => node.parent,
        }
    }

    /// Descendants in tree order, excluding `id` and shadow trees
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, false, &mut out);
        out
    }

    /// `id` and its descendants in shadow-including tree order
    pub fn shadow_including_inclusive_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        self.collect_descendants(id, true, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, include_shadow: bool, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else { return };
        if include_shadow {
            if let Some(root) = node.as_element().and_then(|e| e.shadow_root) {
                out.push(root);
                self.collect_descendants(root, true, out);
            }
        }
        for &child in &node.children {
            out.push(child);
            self.collect_descendants(child, include_shadow, out);
        }
    }

    /// Whether the node's shadow-including root is the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(next) = self.composed_parent(current) {
            current = next;
        }
        current == NodeId::ROOT
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::{ShadowRootData, ShadowRootMode};

    #[test]
    fn test_append_and_remove() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        assert_eq!(tree.children(div), &[span]);
        assert!(tree.is_connected(span));

        tree.remove_child(div, span).unwrap();
        assert!(tree.children(div).is_empty());
        assert!(!tree.is_connected(span));
        assert!(matches!(
            tree.remove_child(div, span),
            Err(DomError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        tree.append_child(a, b).unwrap();
        assert!(matches!(
            tree.append_child(b, a),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_reparenting_moves_node() {
        let mut tree = DomTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let c = tree.create_element("p");
        tree.append_child(a, c).unwrap();
        tree.append_child(b, c).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
    }

    #[test]
    fn test_shadow_tree_connection() {
        let mut tree = DomTree::new();
        let host = tree.create_element("x-host");
        let root = tree.alloc(Node::shadow_root(ShadowRootData::new(
            host,
            ShadowRootMode::Open,
        )));
        tree.get_mut(host).unwrap().as_element_mut().unwrap().shadow_root = Some(root);
        let inner = tree.create_element("input");
        tree.append_child(root, inner).unwrap();

        assert!(!tree.is_connected(inner));
        tree.append_child(tree.root(), host).unwrap();
        assert!(tree.is_connected(inner));

        assert_eq!(tree.descendants(NodeId::ROOT), vec![host]);
        assert_eq!(
            tree.shadow_including_inclusive_descendants(host),
            vec![host, root, inner]
        );
    }
}
