//! Tree id registry
//!
//! Associates each [`TreeId`] with the live object that owns the tree, so
//! requests aimed at a node of a combined tree (focus, click, scroll) can be
//! routed back to the producer of the snapshot it came from. The registry
//! is an ordinary value: hosts create one and pass it where it is needed,
//! typically behind an `Arc`.

use crate::combine::NodeOrigin;
use crate::model::{NodeId, TreeId};
use crate::tree::CombinedTree;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Thread-safe map from tree id to tree owner
#[derive(Debug)]
pub struct TreeRegistry<T> {
    owners: RwLock<HashMap<TreeId, T>>,
}

impl<T> Default for TreeRegistry<T> {
    fn default() -> Self {
        TreeRegistry {
            owners: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> TreeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh tree id and register its owner
    pub fn register_new(&self, owner: T) -> TreeId {
        let tree_id = TreeId::new();
        self.owners.write().insert(tree_id, owner);
        debug!(tree = %tree_id, "registered tree");
        tree_id
    }

    /// Register an owner under an existing tree id
    pub fn register(&self, tree_id: TreeId, owner: T) -> Result<()> {
        if tree_id.is_unknown() {
            return Err(Error::UnknownTree(tree_id));
        }
        let mut owners = self.owners.write();
        if owners.contains_key(&tree_id) {
            return Err(Error::TreeAlreadyRegistered(tree_id));
        }
        owners.insert(tree_id, owner);
        debug!(tree = %tree_id, "registered tree");
        Ok(())
    }

    /// Remove a tree, returning its owner
    pub fn unregister(&self, tree_id: TreeId) -> Option<T> {
        let owner = self.owners.write().remove(&tree_id);
        if owner.is_some() {
            debug!(tree = %tree_id, "unregistered tree");
        }
        owner
    }

    pub fn contains(&self, tree_id: TreeId) -> bool {
        self.owners.read().contains_key(&tree_id)
    }

    pub fn len(&self) -> usize {
        self.owners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.read().is_empty()
    }

    /// All registered tree ids, in no particular order
    pub fn tree_ids(&self) -> Vec<TreeId> {
        self.owners.read().keys().copied().collect()
    }
}

impl<T: Clone> TreeRegistry<T> {
    pub fn get(&self, tree_id: TreeId) -> Option<T> {
        self.owners.read().get(&tree_id).cloned()
    }

    /// Resolve a node of a combined tree to its owner and local id
    pub fn route(&self, tree: &CombinedTree, global_id: NodeId) -> Result<(T, NodeOrigin)> {
        let origin = tree
            .origin(global_id)
            .ok_or(Error::UnknownNode(global_id))?;
        let owner = self
            .get(origin.tree_id)
            .ok_or(Error::UnknownTree(origin.tree_id))?;
        Ok((owner, origin))
    }
}
