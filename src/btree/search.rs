//! Range scans and batched lookups over the leaf chain

use std::fmt::Debug;
use std::ops::Bound;

use super::key::KeyDistance;
use super::tree::BPlusTree;

impl<K, V> BPlusTree<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + PartialEq,
{
    /// Visit every key within the bounds in ascending order
    ///
    /// Descends once to the leaf holding the lower bound, then follows `next`
    /// links until a key passes the upper bound.
    fn scan<F>(&self, lower: Bound<&K>, upper: Bound<&K>, mut visit: F)
    where
        F: FnMut(&K, &[V]),
    {
        let start = match lower {
            Bound::Included(key) | Bound::Excluded(key) => self.find_leaf(key),
            Bound::Unbounded => self.first_leaf(),
        };

        for leaf in self.leaves_from(start) {
            for (key, values) in leaf.keys.iter().zip(&leaf.values) {
                let above_lower = match lower {
                    Bound::Included(lo) => key >= lo,
                    Bound::Excluded(lo) => key > lo,
                    Bound::Unbounded => true,
                };
                if !above_lower {
                    continue;
                }

                let below_upper = match upper {
                    Bound::Included(hi) => key <= hi,
                    Bound::Excluded(hi) => key < hi,
                    Bound::Unbounded => true,
                };
                if !below_upper {
                    return;
                }

                visit(key, values.as_slice());
            }
        }
    }

    /// All values with keys in `[lo, hi]`, in ascending key order
    pub fn range_search(&self, lo: &K, hi: &K) -> Vec<V> {
        if lo > hi {
            return Vec::new();
        }
        self.range_by(Bound::Included(lo), Bound::Included(hi))
    }

    /// All values with keys inside arbitrary bounds, in ascending key order
    pub fn range_by(&self, lower: Bound<&K>, upper: Bound<&K>) -> Vec<V> {
        let mut result = Vec::new();
        self.scan(lower, upper, |_, values| result.extend_from_slice(values));
        result
    }

    /// (key, value) pairs with keys in `[lo, hi]`, in ascending key order
    pub fn range_entries(&self, lo: &K, hi: &K) -> Vec<(K, V)> {
        let mut result = Vec::new();
        if lo > hi {
            return result;
        }

        self.scan(Bound::Included(lo), Bound::Included(hi), |key, values| {
            result.extend(values.iter().map(|value| (key.clone(), value.clone())));
        });
        result
    }
}

impl<K, V> BPlusTree<K, V>
where
    K: Ord + Clone + Debug + KeyDistance,
    V: Clone + PartialEq,
{
    /// Look up many keys at once
    ///
    /// `keys` must be sorted ascending. The walk starts at the first key's
    /// leaf and follows the chain; when the next wanted key lies further than
    /// `REDESCEND_RATIO` of the current leaf's last key, it descends from the
    /// root instead. Missing keys are skipped.
    pub fn multi_key_search(&self, keys: &[K]) -> Vec<(K, V)> {
        let mut results = Vec::with_capacity(keys.len());
        let Some(first) = keys.first() else {
            return results;
        };

        let mut cursor = 0;
        let mut current = Some(self.find_leaf(first));

        while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);

            for (key, values) in leaf.keys.iter().zip(&leaf.values) {
                while cursor < keys.len() && keys[cursor] < *key {
                    cursor += 1;
                }
                if cursor == keys.len() {
                    break;
                }
                if keys[cursor] == *key {
                    results.extend(values.iter().map(|value| (key.clone(), value.clone())));
                    cursor += 1;
                }
            }

            if cursor >= keys.len() {
                break;
            }

            let target = &keys[cursor];
            let redescend = leaf
                .keys
                .last()
                .is_some_and(|last| last.should_redescend(target));

            current = if redescend {
                let found = self.find_leaf(target);
                if found == leaf_id {
                    leaf.next
                } else {
                    Some(found)
                }
            } else {
                leaf.next
            };
        }

        results
    }
}
