//! Insertion-ordered grouping used by every aggregator, so output order
//! follows first encounter in the dataset rather than hash order.

use std::collections::HashMap;
use std::hash::Hash;

pub(crate) struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V> OrderedGroups<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Accumulator for `key`, created by `init` on first sight.
    pub(crate) fn entry_with(&mut self, key: &K, init: impl FnOnce() -> V) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key.clone(), init()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone, V: Default> OrderedGroups<K, V> {
    pub(crate) fn entry(&mut self, key: &K) -> &mut V {
        self.entry_with(key, V::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_encounter_order() {
        let mut groups: OrderedGroups<String, u32> = OrderedGroups::new();
        for key in ["b", "a", "b", "c", "a"] {
            *groups.entry(&key.to_string()) += 1;
        }
        let entries = groups.into_entries();
        assert_eq!(
            entries,
            vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_init_runs_once_per_key() {
        let mut groups: OrderedGroups<&str, String> = OrderedGroups::new();
        groups.entry_with(&"dubai", || "AE".to_string());
        groups.entry_with(&"dubai", || "QA".to_string());
        assert_eq!(groups.into_entries(), vec![("dubai", "AE".to_string())]);
    }
}
