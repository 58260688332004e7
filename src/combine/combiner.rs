//! Splice linked snapshots into one globally numbered tree

use super::{CombinerConfig, IdMap, NodeOrigin};
use crate::model::{
    AttributeKind, NodeRecord, SelectionState, StringAttribute, TreeId, TreeSnapshot, NO_NODE,
};
use crate::tree::CombinedTree;
use crate::{Error, Result, TreeError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Combines a root snapshot and its embedded descendants into one tree.
///
/// Snapshots are borrowed, not copied; only the nodes that end up in the
/// output are cloned as they are rewritten. A combiner performs a single
/// combination, so [`combine`](Self::combine) consumes it.
///
/// # Example
///
/// ```ignore
/// let mut combiner = TreeCombiner::new();
/// combiner.add_snapshot(&page, true);
/// combiner.add_snapshot(&iframe, false);
/// let tree = combiner.combine()?;
/// ```
#[derive(Debug, Default)]
pub struct TreeCombiner<'a> {
    config: CombinerConfig,
    snapshots: Vec<&'a TreeSnapshot>,
    root_tree_id: Option<TreeId>,
}

impl<'a> TreeCombiner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CombinerConfig) -> Self {
        TreeCombiner {
            config,
            ..Default::default()
        }
    }

    /// Register a snapshot for combination.
    ///
    /// Snapshots with an unknown tree id are dropped and `false` is
    /// returned. The first snapshot marked as root wins.
    pub fn add_snapshot(&mut self, snapshot: &'a TreeSnapshot, is_root: bool) -> bool {
        let tree_id = snapshot.tree_id();
        if tree_id.is_unknown() {
            warn!(
                nodes = snapshot.nodes.len(),
                "dropping snapshot with unknown tree id"
            );
            return false;
        }

        if is_root {
            match self.root_tree_id {
                None => self.root_tree_id = Some(tree_id),
                Some(existing) => warn!(
                    root = %existing,
                    ignored = %tree_id,
                    "root already designated, ignoring second root"
                ),
            }
        }

        self.snapshots.push(snapshot);
        true
    }

    /// Number of registered snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Merge every reachable snapshot into one tree with global ids
    pub fn combine(self) -> Result<CombinedTree> {
        let mut trees: HashMap<TreeId, &'a TreeSnapshot> =
            HashMap::with_capacity(self.snapshots.len());
        for snapshot in &self.snapshots {
            let tree_id = snapshot.tree_id();
            if trees.insert(tree_id, *snapshot).is_some() {
                return Err(Error::DuplicateTreeId(tree_id));
            }
        }

        let root_tree_id = self.root_tree_id.unwrap_or_else(TreeId::unknown);
        let root = *trees
            .get(&root_tree_id)
            .ok_or(Error::UnresolvedRoot(root_tree_id))?;

        let mut pass = SplicePass::new(&trees);
        pass.process_tree(root)?;

        let root_id = pass.nodes.first().map_or(NO_NODE, |node| node.id);

        // Focus and selection come from the focused tree, mapped in its own id space.
        let mut tree_data = root.tree_data.clone();
        let focused = match trees.get(&root.tree_data.focused_tree_id) {
            Some(tree) if pass.spliced.contains(&tree.tree_id()) => *tree,
            Some(tree) => {
                warn!(
                    focused = %tree.tree_id(),
                    "focused tree is not part of the combined tree, using root focus"
                );
                root
            }
            None => root,
        };
        let focused_id = focused.tree_id();
        let focused_data = &focused.tree_data;
        let selection = &focused_data.selection;
        tree_data.focus_id = pass.id_map.map_reference(focused_id, focused_data.focus_id)?;
        tree_data.selection = SelectionState {
            anchor_object_id: pass
                .id_map
                .map_reference(focused_id, selection.anchor_object_id)?,
            anchor_offset: selection.anchor_offset,
            anchor_affinity: selection.anchor_affinity,
            focus_object_id: pass
                .id_map
                .map_reference(focused_id, selection.focus_object_id)?,
            focus_offset: selection.focus_offset,
            focus_affinity: selection.focus_affinity,
            is_backward: selection.is_backward,
        };

        let unreached = trees.len() - pass.spliced.len();
        debug!(
            trees = pass.spliced.len(),
            unreached,
            nodes = pass.nodes.len(),
            root_id,
            "combined accessibility trees"
        );

        let combined =
            CombinedTree::new(root_id, pass.nodes, tree_data, pass.id_map.into_origins());

        if self.config.validate_output {
            if let Err(err) = check_output(&combined, &trees) {
                panic!("combiner produced an invalid tree: {err}\n{combined}");
            }
            // Shape problems carried over from the snapshots are not fatal.
            if let Err(err) = combined.validate() {
                warn!(%err, "combined tree is not well formed");
            }
        }

        Ok(combined)
    }
}

/// Check the invariants the splice itself guarantees.
///
/// Global ids must be unique unless the source snapshot repeats a local id,
/// and every child or reference target must have been emitted unless it
/// already named a missing node in its own snapshot.
fn check_output(
    combined: &CombinedTree,
    trees: &HashMap<TreeId, &TreeSnapshot>,
) -> std::result::Result<(), TreeError> {
    let local_count = |origin: NodeOrigin| {
        trees.get(&origin.tree_id).map_or(0, |snapshot| {
            snapshot
                .nodes
                .iter()
                .filter(|n| n.id == origin.local_id)
                .count()
        })
    };

    let mut ids = HashSet::with_capacity(combined.len());
    for node in combined.nodes() {
        if ids.insert(node.id) {
            continue;
        }
        match combined.origin(node.id) {
            Some(origin) if local_count(origin) > 1 => warn!(
                tree = %origin.tree_id,
                local_id = origin.local_id,
                "snapshot repeats a node id"
            ),
            _ => return Err(TreeError::DuplicateNode(node.id)),
        }
    }

    let mut targets = Vec::new();
    for node in combined.nodes() {
        for &child in &node.child_ids {
            if !ids.contains(&child) {
                targets.push((format!("node {} child", node.id), child));
            }
        }
    }
    targets.extend(combined.unresolved_references(&ids));

    for (source_desc, target) in targets {
        match combined.origin(target) {
            Some(origin) if local_count(origin) == 0 => warn!(
                source = %source_desc,
                tree = %origin.tree_id,
                local_id = origin.local_id,
                "reference to a node missing from its snapshot"
            ),
            _ => return Err(TreeError::DanglingReference {
                source_desc,
                target,
            }),
        }
    }

    Ok(())
}

/// State of one depth-first splice over the registered snapshots
struct SplicePass<'t, 'a> {
    trees: &'t HashMap<TreeId, &'a TreeSnapshot>,
    id_map: IdMap,
    nodes: Vec<NodeRecord>,
    /// Trees on the current recursion path
    on_path: HashSet<TreeId>,
    /// Trees already emitted
    spliced: HashSet<TreeId>,
}

impl<'t, 'a> SplicePass<'t, 'a> {
    fn new(trees: &'t HashMap<TreeId, &'a TreeSnapshot>) -> Self {
        SplicePass {
            trees,
            id_map: IdMap::new(),
            nodes: Vec::new(),
            on_path: HashSet::new(),
            spliced: HashSet::new(),
        }
    }

    fn process_tree(&mut self, snapshot: &'a TreeSnapshot) -> Result<()> {
        let tree_id = snapshot.tree_id();
        self.on_path.insert(tree_id);
        self.spliced.insert(tree_id);

        for node in &snapshot.nodes {
            let child_tree = self.accepted_child_tree(tree_id, node)?;
            let mut rewritten = self.rewrite_node(tree_id, node)?;

            // The embedded root becomes the host's last child.
            if let Some((child, child_root)) = child_tree.and_then(|c| c.root().map(|r| (c, r))) {
                rewritten
                    .child_ids
                    .push(self.id_map.get_or_assign(child.tree_id(), child_root.id)?);
            }

            self.nodes.push(rewritten);

            if let Some(child) = child_tree {
                trace!(host = %tree_id, child = %child.tree_id(), "splicing child tree");
                self.process_tree(child)?;
            }
        }

        self.on_path.remove(&tree_id);
        Ok(())
    }

    /// Resolve the child tree a node hosts, if the link is usable
    fn accepted_child_tree(
        &self,
        tree_id: TreeId,
        node: &NodeRecord,
    ) -> Result<Option<&'a TreeSnapshot>> {
        let child_tree_id = match node.child_tree_id() {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!(tree = %tree_id, node = node.id, %err, "ignoring malformed child tree id");
                return Ok(None);
            }
        };

        let Some(&child) = self.trees.get(&child_tree_id) else {
            warn!(
                tree = %tree_id,
                node = node.id,
                child = %child_tree_id,
                "child tree not registered"
            );
            return Ok(None);
        };

        if child.parent_tree_id() != tree_id {
            warn!(
                tree = %tree_id,
                node = node.id,
                child = %child_tree_id,
                parent = %child.parent_tree_id(),
                "child tree names a different parent"
            );
            return Ok(None);
        }

        if child.is_empty() {
            warn!(tree = %tree_id, node = node.id, child = %child_tree_id, "child tree is empty");
            return Ok(None);
        }

        if self.on_path.contains(&child_tree_id) {
            return Err(Error::CyclicTreeReference(child_tree_id));
        }

        if self.spliced.contains(&child_tree_id) {
            warn!(
                tree = %tree_id,
                node = node.id,
                child = %child_tree_id,
                "child tree already spliced under another host"
            );
            return Ok(None);
        }

        Ok(Some(child))
    }

    /// Copy a node with every node id moved into the global space
    fn rewrite_node(&mut self, tree_id: TreeId, node: &NodeRecord) -> Result<NodeRecord> {
        let mut rewritten = node.clone();
        let id_map = &mut self.id_map;

        rewritten.id = id_map.get_or_assign(tree_id, node.id)?;

        for child_id in &mut rewritten.child_ids {
            *child_id = id_map.get_or_assign(tree_id, *child_id)?;
        }

        rewritten.bounds.offset_container_id =
            id_map.map_reference(tree_id, node.bounds.offset_container_id)?;

        for (kind, value) in &mut rewritten.int_attributes {
            if kind.is_node_reference() {
                *value = id_map.map_reference(tree_id, *value)?;
            }
        }

        for (kind, values) in &mut rewritten.int_list_attributes {
            if kind.is_node_reference() {
                for value in values.iter_mut() {
                    *value = id_map.map_reference(tree_id, *value)?;
                }
            }
        }

        rewritten.remove_string_attribute(StringAttribute::ChildTreeId);
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntAttribute, Role};
    use tracing_test::traced_test;

    fn page(tree_id: TreeId) -> TreeSnapshot {
        TreeSnapshot::new(tree_id)
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
            .with_node(NodeRecord::new(2, Role::Button))
    }

    fn host_page(tree_id: TreeId, child: TreeId) -> TreeSnapshot {
        TreeSnapshot::new(tree_id)
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
            .with_node(NodeRecord::new(2, Role::IFrame).with_child_tree(child))
    }

    #[test]
    #[traced_test]
    fn test_unknown_tree_id_is_dropped() {
        let snapshot = page(TreeId::unknown());
        let mut combiner = TreeCombiner::new();
        assert!(!combiner.add_snapshot(&snapshot, true));
        assert!(combiner.is_empty());
        assert!(logs_contain("dropping snapshot with unknown tree id"));

        assert_eq!(
            combiner.combine().unwrap_err(),
            Error::UnresolvedRoot(TreeId::unknown())
        );
    }

    #[test]
    fn test_duplicate_tree_id() {
        let id = TreeId::new();
        let a = page(id);
        let b = page(id);
        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&a, true);
        combiner.add_snapshot(&b, false);
        assert_eq!(combiner.combine().unwrap_err(), Error::DuplicateTreeId(id));
    }

    #[test]
    fn test_no_root_designated() {
        let snapshot = page(TreeId::new());
        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&snapshot, false);
        assert_eq!(combiner.len(), 1);
        assert!(matches!(combiner.combine(), Err(Error::UnresolvedRoot(_))));
    }

    #[test]
    #[traced_test]
    fn test_first_root_wins() {
        let first = page(TreeId::new());
        let second = page(TreeId::new());
        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&first, true);
        combiner.add_snapshot(&second, true);
        assert!(logs_contain("root already designated"));

        let tree = combiner.combine().unwrap();
        assert_eq!(tree.tree_data.tree_id, first.tree_id());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_cycle_is_reported() {
        let a = TreeId::new();
        let b = TreeId::new();
        let root = host_page(a, b).with_parent(b);
        let child = host_page(b, a).with_parent(a);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        combiner.add_snapshot(&child, false);
        assert_eq!(
            combiner.combine().unwrap_err(),
            Error::CyclicTreeReference(a)
        );
    }

    #[test]
    fn test_self_reference_is_reported() {
        let a = TreeId::new();
        let root = host_page(a, a).with_parent(a);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        assert_eq!(
            combiner.combine().unwrap_err(),
            Error::CyclicTreeReference(a)
        );
    }

    #[test]
    #[traced_test]
    fn test_parent_mismatch_is_ignored() {
        let a = TreeId::new();
        let b = TreeId::new();
        let root = host_page(a, b);
        let child = page(b).with_parent(TreeId::new());

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        combiner.add_snapshot(&child, false);
        let tree = combiner.combine().unwrap();

        assert_eq!(tree.len(), 2);
        assert!(tree.node(2).unwrap().child_ids.is_empty());
        assert!(logs_contain("child tree names a different parent"));
    }

    #[test]
    #[traced_test]
    fn test_unregistered_and_empty_children_are_ignored() {
        let a = TreeId::new();
        let b = TreeId::new();
        let root = host_page(a, b);
        let empty = TreeSnapshot::new(b).with_parent(a);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.len(), 2);
        assert!(logs_contain("child tree not registered"));

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        combiner.add_snapshot(&empty, false);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.len(), 2);
        assert!(logs_contain("child tree is empty"));
    }

    #[test]
    #[traced_test]
    fn test_malformed_child_tree_id_is_ignored() {
        let root = TreeSnapshot::new(TreeId::new())
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
            .with_node(
                NodeRecord::new(2, Role::IFrame)
                    .with_string(StringAttribute::ChildTreeId, "not a tree id"),
            );

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(
            tree.node(2).unwrap().string_attribute(StringAttribute::ChildTreeId),
            None
        );
        assert!(logs_contain("ignoring malformed child tree id"));
    }

    #[test]
    fn test_child_tree_spliced_once() {
        let a = TreeId::new();
        let b = TreeId::new();
        let root = TreeSnapshot::new(a)
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2, 3]))
            .with_node(NodeRecord::new(2, Role::IFrame).with_child_tree(b))
            .with_node(NodeRecord::new(3, Role::IFrame).with_child_tree(b));
        let child = page(b).with_parent(a);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        combiner.add_snapshot(&child, false);
        let tree = combiner.combine().unwrap();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.node(2).unwrap().child_ids, vec![4]);
        assert!(tree.node(3).unwrap().child_ids.is_empty());
    }

    #[test]
    fn test_absent_references_stay_absent() {
        let root = TreeSnapshot::new(TreeId::new())
            .with_node(
                NodeRecord::new(5, Role::RootWebArea)
                    .with_int(IntAttribute::ActiveDescendant, NO_NODE)
                    .with_int(IntAttribute::ScrollY, 40),
            );

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();

        let node = tree.node(1).unwrap();
        assert_eq!(node.int_attribute(IntAttribute::ActiveDescendant), Some(NO_NODE));
        assert_eq!(node.int_attribute(IntAttribute::ScrollY), Some(40));
        assert_eq!(node.bounds.offset_container_id, NO_NODE);
        assert_eq!(tree.tree_data.focus_id, NO_NODE);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_selection_direction_copied_verbatim() {
        let id = TreeId::new();
        let selection = SelectionState {
            anchor_object_id: 2,
            anchor_offset: 3,
            focus_object_id: 2,
            focus_offset: 1,
            is_backward: true,
            ..Default::default()
        };
        let root = page(id).with_focus(id, 2).with_selection(selection);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();

        assert!(tree.tree_data.selection.is_backward);
        assert_eq!(tree.tree_data.selection.anchor_offset, 3);
        assert_eq!(tree.tree_data.selection.focus_offset, 1);
        assert_eq!(tree.tree_data.selection.anchor_object_id, 2);
        assert_eq!(tree.tree_data.focus_id, 2);
    }

    #[test]
    #[traced_test]
    fn test_detached_focused_tree_falls_back_to_root() {
        let a = TreeId::new();
        let b = TreeId::new();
        let root = page(a).with_focus(b, 2);
        let detached = page(b).with_focus(b, 2);

        let mut combiner = TreeCombiner::new();
        combiner.add_snapshot(&root, true);
        combiner.add_snapshot(&detached, false);
        let tree = combiner.combine().unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.tree_data.focus_id, 2);
        assert_eq!(tree.origin(2).unwrap().tree_id, a);
        assert!(logs_contain("focused tree is not part of the combined tree"));
    }

    fn checked() -> CombinerConfig {
        CombinerConfig::default().with_validate_output(true)
    }

    #[test]
    #[traced_test]
    fn test_dangling_input_child_is_not_fatal() {
        let root = TreeSnapshot::new(TreeId::new())
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([7]));

        let mut combiner = TreeCombiner::with_config(checked());
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.node(1).unwrap().child_ids, vec![2]);
        assert!(logs_contain("reference to a node missing from its snapshot"));
        assert!(logs_contain("combined tree is not well formed"));
    }

    #[test]
    #[traced_test]
    fn test_root_listed_after_its_children() {
        let id = TreeId::new();
        let root = TreeSnapshot::new(id)
            .with_node(NodeRecord::new(2, Role::Button))
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]));

        let mut combiner = TreeCombiner::with_config(checked());
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_id, 1);
        assert_eq!(tree.node(2).unwrap().child_ids, vec![1]);
        assert!(logs_contain("combined tree is not well formed"));
    }

    #[test]
    #[traced_test]
    fn test_repeated_local_id_is_not_fatal() {
        let root = TreeSnapshot::new(TreeId::new())
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
            .with_node(NodeRecord::new(2, Role::Button))
            .with_node(NodeRecord::new(2, Role::Link));

        let mut combiner = TreeCombiner::with_config(checked());
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.len(), 3);
        assert!(logs_contain("snapshot repeats a node id"));
    }

    #[test]
    fn test_output_check_rejects_splice_defects() {
        let id = TreeId::new();
        let snapshot = TreeSnapshot::new(id)
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([2]))
            .with_node(NodeRecord::new(2, Role::Button));
        let trees = HashMap::from([(id, &snapshot)]);
        let origins = vec![
            NodeOrigin {
                tree_id: id,
                local_id: 1,
            },
            NodeOrigin {
                tree_id: id,
                local_id: 2,
            },
        ];

        let duplicated = CombinedTree::new(
            1,
            vec![
                NodeRecord::new(1, Role::RootWebArea).with_children([2]),
                NodeRecord::new(2, Role::Button),
                NodeRecord::new(2, Role::Button),
            ],
            snapshot.tree_data.clone(),
            origins.clone(),
        );
        assert_eq!(
            check_output(&duplicated, &trees),
            Err(TreeError::DuplicateNode(2))
        );

        // Local node 2 exists, so its global id must have been emitted.
        let dropped = CombinedTree::new(
            1,
            vec![NodeRecord::new(1, Role::RootWebArea).with_children([2])],
            snapshot.tree_data.clone(),
            origins.clone(),
        );
        assert_eq!(
            check_output(&dropped, &trees),
            Err(TreeError::DanglingReference {
                source_desc: "node 1 child".to_string(),
                target: 2
            })
        );

        let unmapped = CombinedTree::new(
            1,
            vec![
                NodeRecord::new(1, Role::RootWebArea)
                    .with_children([2])
                    .with_int(IntAttribute::ActiveDescendant, 9),
                NodeRecord::new(2, Role::Button),
            ],
            snapshot.tree_data.clone(),
            origins,
        );
        assert!(matches!(
            check_output(&unmapped, &trees),
            Err(TreeError::DanglingReference { target: 9, .. })
        ));
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let root = TreeSnapshot::new(TreeId::new())
            .with_node(NodeRecord::new(1, Role::RootWebArea).with_children([7]));

        let mut combiner =
            TreeCombiner::with_config(CombinerConfig::default().with_validate_output(false));
        combiner.add_snapshot(&root, true);
        let tree = combiner.combine().unwrap();
        assert_eq!(tree.node(1).unwrap().child_ids, vec![2]);
        assert!(tree.validate().is_err());
    }
}
