//! The combined tree produced by [`TreeCombiner`](crate::TreeCombiner)

mod validate;

use crate::combine::NodeOrigin;
use crate::model::{NodeId, NodeRecord, TreeData, NO_NODE};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One tree with globally unique node ids.
///
/// Nodes are kept in document order: every embedded subtree follows its
/// host node directly. The reverse table maps each global id back to the
/// snapshot and local id it came from, so actions on a combined node can be
/// routed to the tree that owns it.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CombinedTree {
    pub root_id: NodeId,
    pub tree_data: TreeData,
    nodes: Vec<NodeRecord>,
    origins: Vec<NodeOrigin>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl CombinedTree {
    pub(crate) fn new(
        root_id: NodeId,
        nodes: Vec<NodeRecord>,
        tree_data: TreeData,
        origins: Vec<NodeOrigin>,
    ) -> Self {
        // First occurrence wins so lookups stay stable on malformed output.
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            index.entry(node.id).or_insert(position);
        }
        CombinedTree {
            root_id,
            tree_data,
            nodes,
            origins,
            index,
        }
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by global id
    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.index
            .get(&id)
            .and_then(|&position| self.nodes.get(position))
    }

    pub fn root(&self) -> Option<&NodeRecord> {
        if self.root_id == NO_NODE {
            return None;
        }
        self.node(self.root_id)
    }

    /// Find the node listing `id` as a child
    pub fn parent_of(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.child_ids.contains(&id))
    }

    /// The snapshot and local id a global node came from
    pub fn origin(&self, id: NodeId) -> Option<NodeOrigin> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.origins.get(index).copied()
    }

    /// Depth-first walk from the root, yielding `(depth, node)`
    pub fn walk(&self) -> Vec<(usize, &NodeRecord)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> = Vec::new();
        let mut seen = HashSet::new();
        if let Some(root) = self.root() {
            stack.push((0, root.id));
        }
        while let Some((depth, id)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push((depth, node));
            // Push in reverse so children come out in order
            for &child in node.child_ids.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

impl fmt::Display for CombinedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "tree {} root={} focus={}",
            self.tree_data.tree_id.short(),
            self.root_id,
            self.tree_data.focus_id
        )?;
        for node in &self.nodes {
            write!(f, "  id={} {}", node.id, node.role)?;
            if !node.child_ids.is_empty() {
                let children: Vec<String> =
                    node.child_ids.iter().map(|c| c.to_string()).collect();
                write!(f, " child_ids={}", children.join(","))?;
            }
            if let Some(origin) = self.origin(node.id) {
                write!(f, " from={}:{}", origin.tree_id.short(), origin.local_id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
