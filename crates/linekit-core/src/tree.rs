//! Measurement tree.
//!
//! A forest of leaves (references to measurement lines) and named groups.
//! The algorithms here work on any forest value and do not check that leaf ids
//! point at existing lines; that contract belongs to the caller (see
//! [`crate::Measurement::validate`]).

use serde::{Deserialize, Serialize};

/// Identifier of a tree node. Leaves reuse the id of the line they reference.
pub type NodeId = u32;

/// A leaf referencing a measurement line by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeLeaf {
    pub id: NodeId,
}

/// A named group of child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeGroup {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MeasurementTree>,
}

impl TreeGroup {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MeasurementTree {
    Leaf(TreeLeaf),
    Group(TreeGroup),
}

impl MeasurementTree {
    pub fn leaf(id: NodeId) -> Self {
        MeasurementTree::Leaf(TreeLeaf { id })
    }

    pub fn id(&self) -> NodeId {
        match self {
            MeasurementTree::Leaf(leaf) => leaf.id,
            MeasurementTree::Group(group) => group.id,
        }
    }
}

impl From<TreeGroup> for MeasurementTree {
    fn from(group: TreeGroup) -> Self {
        MeasurementTree::Group(group)
    }
}

impl From<TreeLeaf> for MeasurementTree {
    fn from(leaf: TreeLeaf) -> Self {
        MeasurementTree::Leaf(leaf)
    }
}

/// Finds the first leaf with `id` in depth-first pre-order.
pub fn locate_leaf(tree: &[MeasurementTree], id: NodeId) -> Option<&TreeLeaf> {
    for node in tree {
        match node {
            MeasurementTree::Leaf(leaf) if leaf.id == id => return Some(leaf),
            MeasurementTree::Leaf(_) => {}
            MeasurementTree::Group(group) => {
                if let Some(found) = locate_leaf(&group.items, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Finds the first group with `id` in depth-first pre-order.
pub fn locate_group(tree: &[MeasurementTree], id: NodeId) -> Option<&TreeGroup> {
    for node in tree {
        if let MeasurementTree::Group(group) = node {
            if group.id == id {
                return Some(group);
            }
            if let Some(found) = locate_group(&group.items, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn locate_group_mut(tree: &mut [MeasurementTree], id: NodeId) -> Option<&mut TreeGroup> {
    for node in tree {
        if let MeasurementTree::Group(group) = node {
            if group.id == id {
                return Some(group);
            }
            if let Some(found) = locate_group_mut(&mut group.items, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Removes every node whose id is `id`, at any depth.
///
/// Children of a removed group go with it. Returns the number of nodes that
/// matched `id` directly.
pub fn remove_node(tree: &mut Vec<MeasurementTree>, id: NodeId) -> usize {
    let before = tree.len();
    tree.retain(|node| node.id() != id);
    let mut removed = before - tree.len();

    for node in tree.iter_mut() {
        if let MeasurementTree::Group(group) = node {
            removed += remove_node(&mut group.items, id);
        }
    }

    if removed > 0 {
        tracing::debug!("Removed {} tree node(s) with id {}", removed, id);
    }
    removed
}

/// Largest id anywhere in the forest, or `0` for an empty forest.
pub fn max_id(tree: &[MeasurementTree]) -> NodeId {
    tree.iter()
        .map(|node| match node {
            MeasurementTree::Leaf(leaf) => leaf.id,
            MeasurementTree::Group(group) => group.id.max(max_id(&group.items)),
        })
        .max()
        .unwrap_or(0)
}

/// Allocates a new empty group with id `max_id(tree) + 1`.
///
/// The group is not inserted; two calls against the same forest return the
/// same id, so callers must insert (and commit) before allocating again.
/// Returns `None` once `NodeId::MAX` is in use.
pub fn create_group(tree: &[MeasurementTree], name: impl Into<String>) -> Option<TreeGroup> {
    let id = max_id(tree).checked_add(1)?;
    Some(TreeGroup::new(id, name))
}

/// All leaf ids in depth-first pre-order.
pub fn leaf_ids(tree: &[MeasurementTree]) -> Vec<NodeId> {
    let mut ids = Vec::new();
    collect_leaf_ids(tree, &mut ids);
    ids
}

fn collect_leaf_ids(tree: &[MeasurementTree], out: &mut Vec<NodeId>) {
    for node in tree {
        match node {
            MeasurementTree::Leaf(leaf) => out.push(leaf.id),
            MeasurementTree::Group(group) => collect_leaf_ids(&group.items, out),
        }
    }
}

/// All node ids (leaves and groups) in depth-first pre-order.
pub fn node_ids(tree: &[MeasurementTree]) -> Vec<NodeId> {
    let mut ids = Vec::new();
    collect_node_ids(tree, &mut ids);
    ids
}

fn collect_node_ids(tree: &[MeasurementTree], out: &mut Vec<NodeId>) {
    for node in tree {
        out.push(node.id());
        if let MeasurementTree::Group(group) = node {
            collect_node_ids(&group.items, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MeasurementTree> {
        vec![
            MeasurementTree::leaf(1),
            TreeGroup {
                id: 5,
                name: "walls".into(),
                items: vec![
                    MeasurementTree::leaf(2),
                    TreeGroup {
                        id: 6,
                        name: "north".into(),
                        items: vec![MeasurementTree::leaf(3)],
                    }
                    .into(),
                ],
            }
            .into(),
            MeasurementTree::leaf(4),
        ]
    }

    #[test]
    fn test_locate_leaf_nested() {
        let tree = sample();
        assert_eq!(locate_leaf(&tree, 3), Some(&TreeLeaf { id: 3 }));
        assert_eq!(locate_leaf(&tree, 4), Some(&TreeLeaf { id: 4 }));
    }

    #[test]
    fn test_locate_leaf_ignores_groups() {
        let tree = sample();
        assert!(locate_leaf(&tree, 5).is_none());
        assert!(locate_leaf(&tree, 42).is_none());
    }

    #[test]
    fn test_locate_group() {
        let tree = sample();
        assert_eq!(locate_group(&tree, 6).map(|g| g.name.as_str()), Some("north"));
        assert!(locate_group(&tree, 3).is_none());
    }

    #[test]
    fn test_max_id() {
        assert_eq!(max_id(&sample()), 6);
        assert_eq!(max_id(&[]), 0);
    }

    #[test]
    fn test_create_group_ids() {
        assert_eq!(create_group(&[], "first").unwrap().id, 1);
        let group = create_group(&sample(), "doors").unwrap();
        assert_eq!(group.id, 7);
        assert_eq!(group.name, "doors");
        assert!(group.items.is_empty());
    }

    #[test]
    fn test_create_group_at_id_limit() {
        let tree = vec![MeasurementTree::leaf(NodeId::MAX)];
        assert!(create_group(&tree, "full").is_none());

        let tree = vec![MeasurementTree::leaf(NodeId::MAX - 1)];
        assert_eq!(create_group(&tree, "last").unwrap().id, NodeId::MAX);
    }

    #[test]
    fn test_remove_leaf_at_depth() {
        let mut tree = sample();
        assert_eq!(remove_node(&mut tree, 3), 1);
        assert!(locate_leaf(&tree, 3).is_none());
        assert_eq!(leaf_ids(&tree), vec![1, 2, 4]);
    }

    #[test]
    fn test_remove_group_drops_descendants() {
        let mut tree = sample();
        assert_eq!(remove_node(&mut tree, 5), 1);
        assert!(locate_leaf(&tree, 2).is_none());
        assert!(locate_leaf(&tree, 3).is_none());
        assert_eq!(node_ids(&tree), vec![1, 4]);
    }

    #[test]
    fn test_remove_adjacent_matches() {
        // adjacent duplicates must both go, not just every other one
        let mut tree = vec![
            MeasurementTree::leaf(9),
            MeasurementTree::leaf(9),
            MeasurementTree::leaf(1),
        ];
        assert_eq!(remove_node(&mut tree, 9), 2);
        assert_eq!(node_ids(&tree), vec![1]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut tree = sample();
        assert_eq!(remove_node(&mut tree, 99), 0);
        assert_eq!(tree, sample());
    }

    #[test]
    fn test_serde_tagged_shape() {
        let tree = vec![
            MeasurementTree::leaf(1),
            MeasurementTree::Group(TreeGroup::new(2, "g")),
        ];
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["type"], "leaf");
        assert_eq!(json[1]["type"], "group");
        assert_eq!(json[1]["name"], "g");

        let back: Vec<MeasurementTree> = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
