//! Tree snapshot - one independently numbered accessibility tree

use super::{NodeId, NodeRecord, TreeId, NO_NODE};
use serde::{Deserialize, Serialize};

/// Which side of a line break a caret sits on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAffinity {
    #[default]
    Downstream,
    Upstream,
}

/// Text selection, expressed in node ids of the tree that holds focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub anchor_object_id: NodeId,
    pub anchor_offset: i32,
    pub anchor_affinity: TextAffinity,
    pub focus_object_id: NodeId,
    pub focus_offset: i32,
    pub focus_affinity: TextAffinity,
    /// True when the focus end precedes the anchor
    pub is_backward: bool,
}

impl SelectionState {
    /// A collapsed selection (caret) at the given position
    pub fn caret(object_id: NodeId, offset: i32) -> Self {
        SelectionState {
            anchor_object_id: object_id,
            anchor_offset: offset,
            focus_object_id: object_id,
            focus_offset: offset,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor_object_id == NO_NODE && self.focus_object_id == NO_NODE
    }
}

/// Tree-level metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeData {
    pub tree_id: TreeId,
    /// The tree hosting this one, or unknown for a top-level tree
    pub parent_tree_id: TreeId,
    /// The tree currently holding focus, as seen from this tree
    pub focused_tree_id: TreeId,
    pub title: String,
    pub url: String,
    pub loaded: bool,
    pub loading_progress: f32,
    pub focus_id: NodeId,
    pub selection: SelectionState,
}

impl TreeData {
    pub fn new(tree_id: TreeId) -> Self {
        TreeData {
            tree_id,
            ..Default::default()
        }
    }
}

/// One accessibility tree as produced by its owner.
///
/// Node ids are local to the snapshot. By convention the first node is the
/// snapshot's root and nodes appear in pre-order, though nothing enforces it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub tree_data: TreeData,
    pub nodes: Vec<NodeRecord>,
}

impl TreeSnapshot {
    /// Create an empty snapshot for the given tree
    pub fn new(tree_id: TreeId) -> Self {
        TreeSnapshot {
            tree_data: TreeData::new(tree_id),
            nodes: Vec::new(),
        }
    }

    /// Set the tree hosting this one
    pub fn with_parent(mut self, parent_tree_id: TreeId) -> Self {
        self.tree_data.parent_tree_id = parent_tree_id;
        self
    }

    /// Set the focused tree and the node focused within it
    pub fn with_focus(mut self, focused_tree_id: TreeId, focus_id: NodeId) -> Self {
        self.tree_data.focused_tree_id = focused_tree_id;
        self.tree_data.focus_id = focus_id;
        self
    }

    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.tree_data.selection = selection;
        self
    }

    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeRecord>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn tree_id(&self) -> TreeId {
        self.tree_data.tree_id
    }

    pub fn parent_tree_id(&self) -> TreeId {
        self.tree_data.parent_tree_id
    }

    /// The first node, which is the snapshot's root by convention
    pub fn root(&self) -> Option<&NodeRecord> {
        self.nodes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
