//! B+Tree node definitions
//!
//! Nodes live in the tree's arena and reference each other by `NodeId`.

/// Index of a node slot inside the tree arena
pub type NodeId = usize;

/// A node in the B+Tree (either leaf or internal)
#[derive(Debug, Clone)]
pub(crate) enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Internal(InternalNode<K>),
}

impl<K, V> Node<K, V> {
    /// Number of keys held by this node
    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.keys.len(),
            Node::Internal(internal) => internal.keys.len(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

/// Leaf node: sorted keys, one value-list per key, and a link to the next leaf
#[derive(Debug, Clone)]
pub(crate) struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<Vec<V>>,
    /// Next leaf in ascending key order (traversal only, not ownership)
    pub(crate) next: Option<NodeId>,
}

impl<K: Ord, V> LeafNode<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }
    }

    /// Binary search for key, returns Ok(pos) if present, Err(insert_pos) otherwise
    pub(crate) fn position(&self, key: &K) -> std::result::Result<usize, usize> {
        self.keys.binary_search(key)
    }

    /// Split off the upper half into a new leaf, returning it
    ///
    /// The caller links the new leaf into the arena and fixes `next`.
    pub(crate) fn split(&mut self) -> Self {
        let mid = self.keys.len() / 2;
        Self {
            keys: self.keys.split_off(mid),
            values: self.values.split_off(mid),
            next: self.next,
        }
    }
}

/// Internal node: separator keys routing to `keys.len() + 1` children
///
/// A key `k` routes to child `i` where `i` is the number of separators `<= k`.
#[derive(Debug, Clone)]
pub(crate) struct InternalNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// Child slot a key routes to
    pub(crate) fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|sep| sep <= key)
    }

    /// Insert a separator with the child holding keys `>= key`
    pub(crate) fn insert_child(&mut self, key: K, child: NodeId) {
        let pos = self.child_index(&key);
        self.keys.insert(pos, key);
        self.children.insert(pos + 1, child);
    }

    /// Split around the middle key, returning (promoted key, right half)
    pub(crate) fn split(&mut self) -> (K, Self) {
        let mid = self.keys.len() / 2;
        let right_keys = self.keys.split_off(mid + 1);
        let right_children = self.children.split_off(mid + 1);

        // keys now ends with the promoted middle key
        let promoted = match self.keys.pop() {
            Some(key) => key,
            None => unreachable!("split called on an internal node without keys"),
        };

        (
            promoted,
            Self {
                keys: right_keys,
                children: right_children,
            },
        )
    }
}
