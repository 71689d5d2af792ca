//! B+Tree deletion
//!
//! Removal descends to the owning leaf, then repairs each level on the way
//! back up:
//! - an emptied leaf is dropped from its parent
//! - an underfull node borrows from its right sibling, then its left
//! - otherwise it is merged with a sibling and the separator removed
//!
//! Merges always fold the right node into the left one, so the leaf chain
//! only ever needs `left.next = right.next`.

use std::fmt::Debug;

use super::node::{Node, NodeId};
use super::tree::BPlusTree;

/// What to take out of a key's value-list
enum Removal<'a, V> {
    /// The key and every value under it
    Key,
    /// One matching value; the key goes when its list empties
    Value(&'a V),
}

impl<K, V> BPlusTree<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + PartialEq,
{
    /// Remove a key and all its values, returning the removed values
    pub fn remove_key(&mut self, key: &K) -> Vec<V> {
        self.remove(key, Removal::Key)
    }

    /// Remove one value from a key, returning whether it was present
    pub fn remove_value(&mut self, key: &K, value: &V) -> bool {
        !self.remove(key, Removal::Value(value)).is_empty()
    }

    fn remove(&mut self, key: &K, removal: Removal<'_, V>) -> Vec<V> {
        let root = self.root;
        let removed = self.remove_from(root, key, removal);

        if removed.is_empty() {
            return removed;
        }

        self.len -= removed.len();
        self.collapse_root();
        removed
    }

    fn remove_from(&mut self, id: NodeId, key: &K, removal: Removal<'_, V>) -> Vec<V> {
        match &mut self.nodes[id] {
            Node::Leaf(leaf) => {
                let Ok(pos) = leaf.position(key) else {
                    return Vec::new();
                };

                match removal {
                    Removal::Key => {
                        leaf.keys.remove(pos);
                        leaf.values.remove(pos)
                    }
                    Removal::Value(value) => {
                        let list = &mut leaf.values[pos];
                        let Some(value_pos) = list.iter().position(|v| v == value) else {
                            return Vec::new();
                        };
                        let removed = list.remove(value_pos);

                        if list.is_empty() {
                            leaf.keys.remove(pos);
                            leaf.values.remove(pos);
                        }
                        vec![removed]
                    }
                }
            }
            Node::Internal(internal) => {
                let idx = internal.child_index(key);
                let child = internal.children[idx];
                let removed = self.remove_from(child, key, removal);

                if !removed.is_empty() {
                    self.repair_child(id, idx);
                }
                removed
            }
        }
    }

    /// Restore the size bounds of `parent.children[idx]` after a removal
    fn repair_child(&mut self, parent: NodeId, idx: usize) {
        let child = self.internal(parent).children[idx];
        let (len, is_leaf) = {
            let node = &self.nodes[child];
            (node.len(), node.is_leaf())
        };

        if is_leaf && len == 0 {
            self.drop_empty_leaf(parent, idx);
        } else if len < self.min_keys() {
            self.rebalance_child(parent, idx);
        }
    }

    /// Remove an emptied leaf by folding it together with a sibling
    fn drop_empty_leaf(&mut self, parent: NodeId, idx: usize) {
        let siblings = self.internal(parent).children.len();
        if siblings < 2 {
            return;
        }

        if idx > 0 {
            self.merge_children(parent, idx - 1);
        } else {
            self.merge_children(parent, idx);
        }
    }

    fn rebalance_child(&mut self, parent: NodeId, idx: usize) {
        let min_keys = self.min_keys();
        let (left, right) = {
            let node = self.internal(parent);
            let left = idx.checked_sub(1).map(|i| node.children[i]);
            let right = node.children.get(idx + 1).copied();
            (left, right)
        };

        if let Some(right) = right {
            if self.nodes[right].len() > min_keys {
                self.borrow_from_right(parent, idx);
                return;
            }
        }

        if let Some(left) = left {
            if self.nodes[left].len() > min_keys {
                self.borrow_from_left(parent, idx);
                return;
            }
        }

        if right.is_some() {
            self.merge_children(parent, idx);
        } else if left.is_some() {
            self.merge_children(parent, idx - 1);
        }
    }

    // =========================================================================
    // Borrow
    // =========================================================================

    fn borrow_from_right(&mut self, parent: NodeId, idx: usize) {
        let (child, right) = {
            let node = self.internal(parent);
            (node.children[idx], node.children[idx + 1])
        };

        if self.nodes[child].is_leaf() {
            let (key, values) = {
                let sibling = self.leaf_mut(right);
                (sibling.keys.remove(0), sibling.values.remove(0))
            };
            let separator = self.leaf(right).keys[0].clone();

            let leaf = self.leaf_mut(child);
            leaf.keys.push(key);
            leaf.values.push(values);
            self.internal_mut(parent).keys[idx] = separator;
        } else {
            // Rotate left through the parent separator
            let (up_key, moved) = {
                let sibling = self.internal_mut(right);
                (sibling.keys.remove(0), sibling.children.remove(0))
            };
            let down_key = std::mem::replace(&mut self.internal_mut(parent).keys[idx], up_key);

            let node = self.internal_mut(child);
            node.keys.push(down_key);
            node.children.push(moved);
        }

        tracing::trace!(child, right, "B+Tree borrow from right sibling");
    }

    fn borrow_from_left(&mut self, parent: NodeId, idx: usize) {
        let (left, child) = {
            let node = self.internal(parent);
            (node.children[idx - 1], node.children[idx])
        };

        if self.nodes[child].is_leaf() {
            let (key, values) = {
                let sibling = self.leaf_mut(left);
                let last = sibling.keys.len() - 1;
                (sibling.keys.remove(last), sibling.values.remove(last))
            };
            let separator = key.clone();

            let leaf = self.leaf_mut(child);
            leaf.keys.insert(0, key);
            leaf.values.insert(0, values);
            self.internal_mut(parent).keys[idx - 1] = separator;
        } else {
            // Rotate right through the parent separator
            let (up_key, moved) = {
                let sibling = self.internal_mut(left);
                let last = sibling.keys.len() - 1;
                (sibling.keys.remove(last), sibling.children.remove(last + 1))
            };
            let down_key =
                std::mem::replace(&mut self.internal_mut(parent).keys[idx - 1], up_key);

            let node = self.internal_mut(child);
            node.keys.insert(0, down_key);
            node.children.insert(0, moved);
        }

        tracing::trace!(child, left, "B+Tree borrow from left sibling");
    }

    // =========================================================================
    // Merge
    // =========================================================================

    /// Fold `children[left_idx + 1]` into `children[left_idx]`
    fn merge_children(&mut self, parent: NodeId, left_idx: usize) {
        let (left, right, separator) = {
            let node = self.internal_mut(parent);
            let separator = node.keys.remove(left_idx);
            let right = node.children.remove(left_idx + 1);
            (node.children[left_idx], right, separator)
        };

        let right_node = self.release(right);

        match (&mut self.nodes[left], right_node) {
            (Node::Leaf(left_leaf), Node::Leaf(right_leaf)) => {
                left_leaf.keys.extend(right_leaf.keys);
                left_leaf.values.extend(right_leaf.values);
                left_leaf.next = right_leaf.next;
            }
            (Node::Internal(left_node), Node::Internal(right_node)) => {
                left_node.keys.push(separator);
                left_node.keys.extend(right_node.keys);
                left_node.children.extend(right_node.children);
            }
            _ => unreachable!("sibling nodes {} and {} differ in kind", left, right),
        }

        tracing::trace!(left, right, "B+Tree merged siblings");
    }

    /// Shrink the tree after a delete
    ///
    /// An internal root left with a single child hands the root role to that
    /// child; an empty tree is reset to one fresh leaf.
    fn collapse_root(&mut self) {
        loop {
            let only_child = match &self.nodes[self.root] {
                Node::Internal(internal) if internal.keys.is_empty() => internal.children[0],
                _ => break,
            };

            let old_root = self.root;
            self.root = only_child;
            self.release(old_root);
        }

        if self.len == 0 {
            self.clear();
        }
    }
}
