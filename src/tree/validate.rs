//! Structural checks for combined trees

use super::CombinedTree;
use crate::error::TreeError;
use crate::model::{AttributeKind, NodeId, NO_NODE};
use std::collections::{HashMap, HashSet, VecDeque};

impl CombinedTree {
    /// Check that the tree is a single rooted tree with no dangling ids.
    ///
    /// The first node must be the root, ids must be unique, every child must
    /// exist and have exactly one parent, every node must be reachable from
    /// the root, and every non-zero node reference (offset container, node
    /// id attributes, focus and selection) must resolve.
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(first) = self.nodes.first() else {
            if self.root_id != NO_NODE {
                return Err(TreeError::RootMismatch {
                    root_id: self.root_id,
                    first: NO_NODE,
                });
            }
            return Ok(());
        };

        if self.root_id == NO_NODE {
            return Err(TreeError::EmptyTree);
        }
        if first.id != self.root_id {
            return Err(TreeError::RootMismatch {
                root_id: self.root_id,
                first: first.id,
            });
        }

        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(TreeError::DuplicateNode(node.id));
            }
        }

        let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
        for node in &self.nodes {
            for &child in &node.child_ids {
                if !ids.contains(&child) {
                    return Err(TreeError::MissingChild {
                        parent: node.id,
                        child,
                    });
                }
                if child == self.root_id {
                    return Err(TreeError::Reparented {
                        child,
                        first: NO_NODE,
                        second: node.id,
                    });
                }
                if let Some(&first) = parents.get(&child) {
                    return Err(TreeError::Reparented {
                        child,
                        first,
                        second: node.id,
                    });
                }
                parents.insert(child, node.id);
            }
        }

        let mut reached = HashSet::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root_id]);
        while let Some(id) = queue.pop_front() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(node) = self.node(id) {
                queue.extend(node.child_ids.iter().copied());
            }
        }
        if let Some(node) = self.nodes.iter().find(|n| !reached.contains(&n.id)) {
            return Err(TreeError::Unreachable(node.id));
        }

        match self.unresolved_references(&ids).into_iter().next() {
            Some((source_desc, target)) => Err(TreeError::DanglingReference {
                source_desc,
                target,
            }),
            None => Ok(()),
        }
    }

    /// Every non-zero node reference whose target is not in `ids`, with a
    /// description of where it was found.
    pub(crate) fn unresolved_references(&self, ids: &HashSet<NodeId>) -> Vec<(String, NodeId)> {
        let mut unresolved = Vec::new();
        for node in &self.nodes {
            push_unresolved(&mut unresolved, ids, node.bounds.offset_container_id, || {
                format!("node {} offset container", node.id)
            });

            for (kind, value) in &node.int_attributes {
                if kind.is_node_reference() {
                    push_unresolved(&mut unresolved, ids, *value, || {
                        format!("node {} {:?}", node.id, kind)
                    });
                }
            }

            for (kind, values) in &node.int_list_attributes {
                if kind.is_node_reference() {
                    for value in values {
                        push_unresolved(&mut unresolved, ids, *value, || {
                            format!("node {} {:?}", node.id, kind)
                        });
                    }
                }
            }
        }

        let data = &self.tree_data;
        push_unresolved(&mut unresolved, ids, data.focus_id, || "focus".to_string());
        push_unresolved(&mut unresolved, ids, data.selection.anchor_object_id, || {
            "selection anchor".to_string()
        });
        push_unresolved(&mut unresolved, ids, data.selection.focus_object_id, || {
            "selection focus".to_string()
        });
        unresolved
    }
}

fn push_unresolved(
    unresolved: &mut Vec<(String, NodeId)>,
    ids: &HashSet<NodeId>,
    target: NodeId,
    source_desc: impl FnOnce() -> String,
) {
    if target != NO_NODE && !ids.contains(&target) {
        unresolved.push((source_desc(), target));
    }
}
