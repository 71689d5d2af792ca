//! B+Tree implementation
//!
//! Arena-backed tree: every node lives in `nodes`, links are `NodeId`s, and
//! slots released by merges are recycled through `free_list`.

use std::fmt::Debug;

use crate::config::MIN_BTREE_ORDER;
use crate::error::{ArborError, Result};

use super::node::{InternalNode, LeafNode, Node, NodeId};

/// An ordered index mapping each key to one or more values
#[derive(Debug, Clone)]
pub struct BPlusTree<K, V> {
    /// Max keys per node + 1
    pub(super) order: usize,
    /// Node arena
    pub(super) nodes: Vec<Node<K, V>>,
    /// Released arena slots available for reuse
    pub(super) free_list: Vec<NodeId>,
    /// Current root slot
    pub(super) root: NodeId,
    /// Total number of values across all keys
    pub(super) len: usize,
}

// =============================================================================
// Arena Access
// =============================================================================

impl<K, V> BPlusTree<K, V> {
    pub(super) fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match &self.nodes[id] {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("node {} is not a leaf", id),
        }
    }

    pub(super) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match &mut self.nodes[id] {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("node {} is not a leaf", id),
        }
    }

    pub(super) fn internal(&self, id: NodeId) -> &InternalNode<K> {
        match &self.nodes[id] {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => unreachable!("node {} is not an internal node", id),
        }
    }

    pub(super) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        match &mut self.nodes[id] {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => unreachable!("node {} is not an internal node", id),
        }
    }

    /// Store a node, reusing a released slot when one is available
    pub(super) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id] = node;
            id
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Take a node out of the arena and release its slot
    pub(super) fn release(&mut self, id: NodeId) -> Node<K, V> {
        self.free_list.push(id);
        std::mem::replace(
            &mut self.nodes[id],
            Node::Leaf(LeafNode {
                keys: Vec::new(),
                values: Vec::new(),
                next: None,
            }),
        )
    }

    /// Leftmost leaf, the head of the leaf chain
    pub(super) fn first_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let Node::Internal(internal) = &self.nodes[id] {
            id = internal.children[0];
        }
        id
    }

    /// Iterate leaves along the chain starting at `start`
    pub(super) fn leaves_from(&self, start: NodeId) -> Leaves<'_, K, V> {
        Leaves {
            tree: self,
            next: Some(start),
        }
    }

    /// Max keys a node may hold before splitting
    pub(super) fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Min keys a non-root node must keep after a delete
    pub(super) fn min_keys(&self) -> usize {
        (self.order - 1) / 2
    }

    /// Get the tree order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Total number of values stored (a key with three values counts three)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from root to leaves (a lone leaf has height 1)
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let Node::Internal(internal) = &self.nodes[id] {
            id = internal.children[0];
            height += 1;
        }
        height
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.leaves_from(self.first_leaf())
            .map(|leaf| leaf.keys.len())
            .sum()
    }

    /// Drop every entry and reset the arena to a single empty leaf
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.nodes.push(Node::Leaf(LeafNode {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }));
        self.root = 0;
        self.len = 0;
    }
}

// =============================================================================
// Insert / Lookup / Update
// =============================================================================

impl<K, V> BPlusTree<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + PartialEq,
{
    /// Create an empty tree
    ///
    /// # Panics
    /// If `order` is below 3; `Config::validate` rejects such orders first.
    pub fn new(order: usize) -> Self {
        assert!(
            order >= MIN_BTREE_ORDER,
            "B+Tree order must be at least {}, got {}",
            MIN_BTREE_ORDER,
            order
        );

        Self {
            order,
            nodes: vec![Node::Leaf(LeafNode::new())],
            free_list: Vec::new(),
            root: 0,
            len: 0,
        }
    }

    /// Leaf that owns (or would own) `key`
    pub(super) fn find_leaf(&self, key: &K) -> NodeId {
        let mut id = self.root;
        while let Node::Internal(internal) = &self.nodes[id] {
            id = internal.children[internal.child_index(key)];
        }
        id
    }

    /// Insert a key-value pair
    ///
    /// An existing key gets `value` appended to its value-list, so callers
    /// that need one value per key must check `contains_key` first.
    pub fn insert(&mut self, key: K, value: V) {
        let root = self.root;

        if let Some((separator, right)) = self.insert_into(root, key, value) {
            let new_root = InternalNode {
                keys: vec![separator],
                children: vec![root, right],
            };
            self.root = self.alloc(Node::Internal(new_root));
            tracing::trace!(height = self.height(), "B+Tree root split");
        }

        self.len += 1;
    }

    /// Recursive insert; returns the separator and new right sibling on split
    fn insert_into(&mut self, id: NodeId, key: K, value: V) -> Option<(K, NodeId)> {
        let max_keys = self.max_keys();

        match &mut self.nodes[id] {
            Node::Leaf(leaf) => {
                match leaf.position(&key) {
                    Ok(pos) => {
                        leaf.values[pos].push(value);
                        return None;
                    }
                    Err(pos) => {
                        leaf.keys.insert(pos, key);
                        leaf.values.insert(pos, vec![value]);
                    }
                }

                if leaf.keys.len() <= max_keys {
                    return None;
                }

                let right = leaf.split();
                let separator = right.keys[0].clone();
                let right_id = self.alloc(Node::Leaf(right));
                self.leaf_mut(id).next = Some(right_id);

                Some((separator, right_id))
            }
            Node::Internal(internal) => {
                let child = internal.children[internal.child_index(&key)];
                let (separator, new_child) = self.insert_into(child, key, value)?;

                let internal = self.internal_mut(id);
                internal.insert_child(separator, new_child);

                if internal.keys.len() <= max_keys {
                    return None;
                }

                let (promoted, right) = internal.split();
                let right_id = self.alloc(Node::Internal(right));

                Some((promoted, right_id))
            }
        }
    }

    /// Get all values for a key (empty if absent)
    pub fn search(&self, key: &K) -> Vec<V> {
        self.get(key).map(<[V]>::to_vec).unwrap_or_default()
    }

    /// Borrow the value-list for a key
    pub fn get(&self, key: &K) -> Option<&[V]> {
        let leaf = self.leaf(self.find_leaf(key));
        leaf.position(key)
            .ok()
            .map(|pos| leaf.values[pos].as_slice())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Replace the whole value-list of `key` with a single value
    pub fn update(&mut self, key: &K, value: V) -> Result<()> {
        let leaf_id = self.find_leaf(key);
        let leaf = self.leaf_mut(leaf_id);

        let pos = leaf
            .position(key)
            .map_err(|_| ArborError::KeyNotFound(format!("{:?}", key)))?;
        let previous = std::mem::replace(&mut leaf.values[pos], vec![value]);

        self.len = self.len + 1 - previous.len();
        Ok(())
    }

    /// Replace one value of `key` in place
    pub fn update_value(&mut self, key: &K, old_value: &V, new_value: V) -> Result<()> {
        let leaf_id = self.find_leaf(key);
        let leaf = self.leaf_mut(leaf_id);

        let pos = leaf
            .position(key)
            .map_err(|_| ArborError::KeyNotFound(format!("{:?}", key)))?;
        let slot = leaf.values[pos]
            .iter_mut()
            .find(|value| **value == *old_value)
            .ok_or_else(|| ArborError::KeyNotFound(format!("value under key {:?}", key)))?;

        *slot = new_value;
        Ok(())
    }

    /// Move every value from `old_key` to `new_key`
    pub fn update_key(&mut self, old_key: &K, new_key: K) -> Result<()> {
        if !self.contains_key(old_key) {
            return Err(ArborError::KeyNotFound(format!("{:?}", old_key)));
        }
        if *old_key == new_key {
            return Ok(());
        }
        if self.contains_key(&new_key) {
            return Err(ArborError::DuplicateKey(format!("{:?}", new_key)));
        }

        for value in self.remove_key(old_key) {
            self.insert(new_key.clone(), value);
        }

        Ok(())
    }

    // =========================================================================
    // Full Scans
    // =========================================================================

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<K> {
        self.leaves_from(self.first_leaf())
            .flat_map(|leaf| leaf.keys.iter().cloned())
            .collect()
    }

    /// All values in ascending key order
    pub fn values(&self) -> Vec<V> {
        self.leaves_from(self.first_leaf())
            .flat_map(|leaf| leaf.values.iter().flatten().cloned())
            .collect()
    }

    /// All (key, value) pairs in ascending key order
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len);
        for leaf in self.leaves_from(self.first_leaf()) {
            for (key, values) in leaf.keys.iter().zip(&leaf.values) {
                entries.extend(values.iter().map(|value| (key.clone(), value.clone())));
            }
        }
        entries
    }
}

// =============================================================================
// Leaf Chain Iterator
// =============================================================================

/// Walks leaves through their `next` links
pub(super) struct Leaves<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for Leaves<'a, K, V> {
    type Item = &'a LeafNode<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let tree = self.tree;
        let leaf = tree.leaf(id);
        self.next = leaf.next;
        Some(leaf)
    }
}
