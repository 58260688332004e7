//! Local-to-global node id mapping

use crate::model::{NodeId, TreeId, NO_NODE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a global node came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeOrigin {
    pub tree_id: TreeId,
    pub local_id: NodeId,
}

/// Assigns global ids to `(tree, local id)` pairs on first use.
///
/// Global ids are handed out sequentially starting at 1, so the reverse
/// table is a plain vector indexed by `global - 1`. Assignment fails with
/// [`Error::IdSpaceExhausted`] once every positive [`NodeId`] is taken.
#[derive(Clone, Debug)]
pub struct IdMap {
    forward: HashMap<(TreeId, NodeId), NodeId>,
    origins: Vec<NodeOrigin>,
    max_id: NodeId,
}

impl Default for IdMap {
    fn default() -> Self {
        IdMap {
            forward: HashMap::new(),
            origins: Vec::new(),
            max_id: NodeId::MAX,
        }
    }
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_max_id(max_id: NodeId) -> Self {
        IdMap {
            max_id,
            ..Default::default()
        }
    }

    /// Get the global id for a local id, assigning the next one if unseen
    pub fn get_or_assign(&mut self, tree_id: TreeId, local_id: NodeId) -> Result<NodeId> {
        if let Some(&global) = self.forward.get(&(tree_id, local_id)) {
            return Ok(global);
        }
        let global = NodeId::try_from(self.origins.len() + 1)
            .ok()
            .filter(|&id| id <= self.max_id)
            .ok_or(Error::IdSpaceExhausted(self.max_id))?;
        self.origins.push(NodeOrigin { tree_id, local_id });
        self.forward.insert((tree_id, local_id), global);
        Ok(global)
    }

    /// Map an optional reference; [`NO_NODE`] stays [`NO_NODE`]
    pub fn map_reference(&mut self, tree_id: TreeId, local_id: NodeId) -> Result<NodeId> {
        if local_id == NO_NODE {
            Ok(NO_NODE)
        } else {
            self.get_or_assign(tree_id, local_id)
        }
    }

    /// Look up a global id without assigning
    pub fn get(&self, tree_id: TreeId, local_id: NodeId) -> Option<NodeId> {
        self.forward.get(&(tree_id, local_id)).copied()
    }

    /// Reverse lookup of a global id
    pub fn origin(&self, global: NodeId) -> Option<NodeOrigin> {
        let index = usize::try_from(global).ok()?.checked_sub(1)?;
        self.origins.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Consume the map, keeping only the reverse table
    pub(crate) fn into_origins(self) -> Vec<NodeOrigin> {
        self.origins
    }
}
