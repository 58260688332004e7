//! Core data model types for axcombine

mod attribute;
mod node;
mod role;
mod snapshot;
mod tree_id;

pub use attribute::{
    AttributeKind, BoolAttribute, FloatAttribute, IntAttribute, IntListAttribute,
    StringAttribute,
};
pub use node::{NodeId, NodeRecord, Rect, RelativeBounds, NO_NODE};
pub use role::Role;
pub use snapshot::{SelectionState, TextAffinity, TreeData, TreeSnapshot};
pub use tree_id::TreeId;
