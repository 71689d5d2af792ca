//! Key distance used by batched lookups

/// Relative gap (of the current key's magnitude) beyond which a batched
/// lookup re-descends from the root instead of walking the leaf chain
pub const REDESCEND_RATIO: f64 = 0.1;

/// Numeric distance between keys, used to decide between walking the leaf
/// chain and re-descending from the root
pub trait KeyDistance {
    /// Absolute distance between two keys
    fn distance(&self, other: &Self) -> f64;

    /// Scale of this key; the walk threshold is `magnitude * REDESCEND_RATIO`
    fn magnitude(&self) -> f64;

    /// Whether `next` is far enough from `self` to justify a fresh descent
    fn should_redescend(&self, next: &Self) -> bool {
        self.distance(next) > self.magnitude() * REDESCEND_RATIO
    }
}

impl KeyDistance for i64 {
    fn distance(&self, other: &Self) -> f64 {
        (*self as f64 - *other as f64).abs()
    }

    fn magnitude(&self) -> f64 {
        (*self as f64).abs()
    }
}

impl KeyDistance for f64 {
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }

    fn magnitude(&self) -> f64 {
        self.abs()
    }
}
