//! Insertion-ordered index from a name (operator or rule type) to the set of
//! rule identifiers registered under it.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default, Clone)]
/// Keys keep first-seen order; identifier sets are sorted and deduplicated.
pub struct IdIndex {
    entries: Vec<(String, BTreeSet<String>)>,
    positions: HashMap<String, usize>,
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under `key`. Returns false when the pair was already present.
    pub fn insert(&mut self, key: &str, id: &str) -> bool {
        let pos = match self.positions.get(key) {
            Some(&p) => p,
            None => {
                self.entries.push((key.to_string(), BTreeSet::new()));
                let p = self.entries.len() - 1;
                self.positions.insert(key.to_string(), p);
                p
            }
        };
        self.entries[pos].1.insert(id.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.positions.get(key).map(|&p| &self.entries[p].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, ids)| (k.as_str(), ids))
    }

    /// Number of identifiers summed over every key (an id under two keys counts twice).
    pub fn total_ids(&self) -> usize {
        self.entries.iter().map(|(_, ids)| ids.len()).sum()
    }
}

/// Join identifiers in sorted order with `", "`.
pub fn join_ids(ids: &BTreeSet<String>) -> String {
    ids.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
