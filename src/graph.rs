//! Key feature -> matched features result model
use std::collections::HashMap;

use crate::interval::Interval;

/// Extracts the identity a feature is stored under.
pub type KeyFn = fn(&Interval) -> &str;

/// Features are keyed by name alone.
pub fn by_name(iv: &Interval) -> &str {
    &iv.name
}

/// One-to-many overlap index.
///
/// Each slot is a non-empty list whose element 0 is the key feature and whose
/// remaining elements are the matched child features, one per match edge
/// (duplicates kept). The first feature seen under a key stays the slot's
/// key; later features with the same key but other coordinates only add
/// edges. Iteration follows first-insertion order.
#[derive(Clone)]
pub struct OverlapGraph {
    slots: Vec<Vec<Interval>>,
    lookup: HashMap<String, usize>,
    key_fn: KeyFn,
    num_edges: usize,
}

impl std::fmt::Debug for OverlapGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapGraph")
            .field("keys", &self.slots.len())
            .field("edges", &self.num_edges)
            .finish()
    }
}

impl Default for OverlapGraph {
    fn default() -> Self {
        Self::with_key_fn(by_name)
    }
}

impl OverlapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_fn(key_fn: KeyFn) -> Self {
        OverlapGraph {
            slots: vec![],
            lookup: HashMap::new(),
            key_fn,
            num_edges: 0,
        }
    }

    /// Get-or-create the slot for `key`, returning its position
    fn slot_for(&mut self, key: Interval) -> usize {
        let k = (self.key_fn)(&key);
        if let Some(&idx) = self.lookup.get(k) {
            return idx;
        }
        let idx = self.slots.len();
        self.lookup.insert(k.to_string(), idx);
        self.slots.push(vec![key]);
        idx
    }

    /// Record one match edge `key -> child`
    pub fn add_match(&mut self, key: Interval, child: Interval) {
        let idx = self.slot_for(key);
        self.slots[idx].push(child);
        self.num_edges += 1;
    }

    /// Full slot: key feature followed by its children
    pub fn get(&self, key: &str) -> Option<&[Interval]> {
        self.lookup.get(key).map(|&i| self.slots[i].as_slice())
    }

    pub fn key_feature(&self, key: &str) -> Option<&Interval> {
        self.get(key).map(|s| &s[0])
    }

    pub fn children(&self, key: &str) -> Option<&[Interval]> {
        self.get(key).map(|s| &s[1..])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    /// Number of key features
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// `(key, children)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Interval, &[Interval])> {
        self.slots.iter().map(|s| (&s[0], &s[1..]))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(move |s| (self.key_fn)(&s[0]))
    }

    pub fn key_features(&self) -> impl Iterator<Item = &Interval> {
        self.slots.iter().map(|s| &s[0])
    }

    /// Every child, once per edge
    pub fn child_features(&self) -> impl Iterator<Item = &Interval> {
        self.slots.iter().flat_map(|s| s[1..].iter())
    }

    /// Graph with the roles flipped: each child becomes a key pointing back
    /// at the features it was matched under.
    pub fn reversed(&self) -> OverlapGraph {
        let mut rev = OverlapGraph::with_key_fn(self.key_fn);
        for (key, children) in self.iter() {
            for child in children {
                rev.add_match(child.clone(), key.clone());
            }
        }
        rev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Strand;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn iv(name: &str, start: u64, stop: u64) -> Interval {
        Interval::new("chr1", start, stop, Strand::Plus, name)
    }

    #[rstest]
    fn test_first_key_wins() {
        let mut g = OverlapGraph::new();
        g.add_match(iv("L1", 0, 100), iv("P1", 10, 20));
        g.add_match(iv("L1", 500, 600), iv("P2", 510, 520));
        assert_eq!(g.len(), 1);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.key_feature("L1"), Some(&iv("L1", 0, 100)));
        let names: Vec<&str> = g.children("L1").unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["P1", "P2"]);
    }

    #[rstest]
    fn test_duplicate_edges_kept() {
        let mut g = OverlapGraph::new();
        g.add_match(iv("B1", 150, 160), iv("A1", 100, 200));
        g.add_match(iv("B1", 150, 160), iv("A1", 140, 170));
        assert_eq!(g.get("B1").unwrap().len(), 3);
        assert_eq!(g.child_features().count(), 2);
    }

    #[rstest]
    fn test_insertion_order() {
        let mut g = OverlapGraph::new();
        for k in ["z", "a", "m"] {
            g.add_match(iv(k, 0, 1), iv("c", 0, 1));
        }
        assert_eq!(g.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[rstest]
    fn test_reversed() {
        let mut g = OverlapGraph::new();
        g.add_match(iv("L1", 0, 100), iv("P1", 10, 20));
        g.add_match(iv("L2", 15, 300), iv("P1", 10, 20));
        let r = g.reversed();
        assert_eq!(r.len(), 1);
        let names: Vec<&str> = r.children("P1").unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["L1", "L2"]);
    }

    #[rstest]
    fn test_custom_key_fn() {
        fn by_chrom(iv: &Interval) -> &str {
            &iv.chrom
        }
        let mut g = OverlapGraph::with_key_fn(by_chrom);
        g.add_match(iv("L1", 0, 100), iv("P1", 10, 20));
        g.add_match(iv("L2", 0, 100), iv("P2", 10, 20));
        assert_eq!(g.len(), 1);
        assert!(g.contains_key("chr1"));
    }
}
