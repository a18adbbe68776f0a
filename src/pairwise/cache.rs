// Distance cache — pairwise distances already computed in this session.
//
// Owned by the caller and passed in explicitly; nothing in the crate keeps
// one around on its own. A batch over one citation network reuses it so a
// document pair shared by several targets is only compared once.

use std::collections::HashMap;

/// Symmetric map `(id, id) -> distance`.
#[derive(Debug, Clone, Default)]
pub struct DistanceCache {
    distances: HashMap<(String, String), f64>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(&key(a, b)).copied()
    }

    pub fn insert(&mut self, a: &str, b: &str, distance: f64) {
        self.distances.insert(key(a, b), distance);
    }

    /// Number of distinct unordered pairs.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Unordered pair key: the smaller id always comes first.
fn key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_symmetric() {
        let mut cache = DistanceCache::new();
        cache.insert("12", "7", 0.4);
        assert_eq!(cache.get("7", "12"), Some(0.4));
        assert_eq!(cache.get("12", "7"), Some(0.4));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_pair() {
        let cache = DistanceCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a", "b"), None);
    }
}
