//! # axcombine
//!
//! Combines linked accessibility tree snapshots into one tree.
//!
//! Applications with frames, subdocuments or embedded surfaces expose their
//! accessibility tree as several independently numbered snapshots, linked by
//! "this node hosts that tree" attributes. axcombine splices those snapshots
//! into a single tree with globally unique node ids, so assistive technology
//! can walk the whole UI at once.
//!
//! ## Core Concepts
//!
//! - **TreeId**: Opaque, process-unique identity of one snapshot
//! - **TreeSnapshot**: Nodes plus tree-level metadata, numbered locally
//! - **TreeCombiner**: Depth-first splice and renumber pass over snapshots
//! - **CombinedTree**: The result, with every node reference rewritten
//! - **TreeRegistry**: Routes combined nodes back to the owner of their tree
//!
//! ## Example
//!
//! ```ignore
//! use axcombine::{NodeRecord, Role, TreeCombiner, TreeId, TreeSnapshot};
//!
//! let page_id = TreeId::new();
//! let frame_id = TreeId::new();
//!
//! let page = TreeSnapshot::new(page_id)
//!     .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
//!     .with_node(NodeRecord::new(2, Role::IFrame).with_child_tree(frame_id));
//! let frame = TreeSnapshot::new(frame_id)
//!     .with_parent(page_id)
//!     .with_node(NodeRecord::new(1, Role::RootWebArea));
//!
//! let mut combiner = TreeCombiner::new();
//! combiner.add_snapshot(&page, true);
//! combiner.add_snapshot(&frame, false);
//! let tree = combiner.combine()?;
//! assert_eq!(tree.len(), 3);
//! ```

pub mod combine;
pub mod model;
pub mod registry;
pub mod tree;

mod error;

pub use combine::{CombinerConfig, IdMap, NodeOrigin, TreeCombiner};
pub use error::{Error, Result, TreeError};
pub use model::{
    AttributeKind, BoolAttribute, FloatAttribute, IntAttribute, IntListAttribute, NodeId,
    NodeRecord, Rect, RelativeBounds, Role, SelectionState, StringAttribute, TextAffinity,
    TreeData, TreeId, TreeSnapshot, NO_NODE,
};
pub use registry::TreeRegistry;
pub use tree::CombinedTree;
