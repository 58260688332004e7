//! Node record - one accessibility node as authored in a snapshot

use super::{
    BoolAttribute, FloatAttribute, IntAttribute, IntListAttribute, Role, StringAttribute, TreeId,
};
use serde::{Deserialize, Serialize};

/// Node identifier. Local to a snapshot until combined; `0` means "no node".
pub type NodeId = i32;

/// The id used for absent node references
pub const NO_NODE: NodeId = 0;

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// Bounds relative to an offset container node
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelativeBounds {
    /// Node the rect is relative to, or [`NO_NODE`] for the tree origin
    pub offset_container_id: NodeId,
    pub rect: Rect,
}

/// A single node in a tree snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub role: Role,
    pub child_ids: Vec<NodeId>,
    pub bounds: RelativeBounds,
    pub string_attributes: Vec<(StringAttribute, String)>,
    pub int_attributes: Vec<(IntAttribute, i32)>,
    pub int_list_attributes: Vec<(IntListAttribute, Vec<i32>)>,
    pub bool_attributes: Vec<(BoolAttribute, bool)>,
    pub float_attributes: Vec<(FloatAttribute, f32)>,
}

impl NodeRecord {
    /// Create a node with no children or attributes
    pub fn new(id: NodeId, role: Role) -> Self {
        NodeRecord {
            id,
            role,
            ..Default::default()
        }
    }

    pub fn with_children(mut self, child_ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.child_ids = child_ids.into_iter().collect();
        self
    }

    pub fn with_bounds(mut self, offset_container_id: NodeId, rect: Rect) -> Self {
        self.bounds = RelativeBounds {
            offset_container_id,
            rect,
        };
        self
    }

    pub fn with_string(mut self, kind: StringAttribute, value: impl Into<String>) -> Self {
        self.string_attributes.push((kind, value.into()));
        self
    }

    pub fn with_int(mut self, kind: IntAttribute, value: i32) -> Self {
        self.int_attributes.push((kind, value));
        self
    }

    pub fn with_int_list(mut self, kind: IntListAttribute, values: Vec<i32>) -> Self {
        self.int_list_attributes.push((kind, values));
        self
    }

    pub fn with_bool(mut self, kind: BoolAttribute, value: bool) -> Self {
        self.bool_attributes.push((kind, value));
        self
    }

    pub fn with_float(mut self, kind: FloatAttribute, value: f32) -> Self {
        self.float_attributes.push((kind, value));
        self
    }

    /// Mark this node as the host of an embedded child tree
    pub fn with_child_tree(self, tree_id: TreeId) -> Self {
        self.with_string(StringAttribute::ChildTreeId, tree_id.to_string())
    }

    pub fn string_attribute(&self, kind: StringAttribute) -> Option<&str> {
        self.string_attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_str())
    }

    pub fn int_attribute(&self, kind: IntAttribute) -> Option<i32> {
        self.int_attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
    }

    pub fn int_list_attribute(&self, kind: IntListAttribute) -> Option<&[i32]> {
        self.int_list_attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_slice())
    }

    pub fn bool_attribute(&self, kind: BoolAttribute) -> Option<bool> {
        self.bool_attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
    }

    pub fn float_attribute(&self, kind: FloatAttribute) -> Option<f32> {
        self.float_attributes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
    }

    /// Remove every string attribute of the given kind
    pub fn remove_string_attribute(&mut self, kind: StringAttribute) {
        self.string_attributes.retain(|(k, _)| *k != kind);
    }

    /// The embedded child tree named by this node, if any.
    ///
    /// Returns `Ok(None)` when the attribute is missing or empty.
    pub fn child_tree_id(&self) -> crate::Result<Option<TreeId>> {
        match self.string_attribute(StringAttribute::ChildTreeId) {
            Some(s) => {
                let id: TreeId = s.parse()?;
                Ok((!id.is_unknown()).then_some(id))
            }
            None => Ok(None),
        }
    }
}
