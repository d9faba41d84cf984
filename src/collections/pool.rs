// ============================================================================
// spark-lookup - RecyclePool
// Retired (emptied) groups kept by key so a returning key gets its old
// group object back
// ============================================================================
//
// Keyed by value equality (`Eq + Hash`), not by the lookup's comparator.
// The pool never evicts on its own; it grows with every distinct retired
// key until the owner purges it or switches reuse off.
// ============================================================================

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::collections::group::ObservableGroup;

pub(crate) struct RecyclePool<K, T> {
    retired: HashMap<K, Rc<ObservableGroup<K, T>>>,
}

impl<K, T> RecyclePool<K, T>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            retired: HashMap::new(),
        }
    }

    /// Empty `group` and keep it under its own key.
    pub fn retire(&mut self, group: Rc<ObservableGroup<K, T>>) {
        group.clear();
        self.retired.insert(group.key().clone(), group);
    }

    /// Keep an already empty group (one that never went live).
    pub fn restore(&mut self, group: Rc<ObservableGroup<K, T>>) {
        debug_assert!(group.is_empty(), "only empty groups can be restored");
        self.retired.insert(group.key().clone(), group);
    }

    /// Take the retired group for `key` out of the pool.
    pub fn revive(&mut self, key: &K) -> Option<Rc<ObservableGroup<K, T>>> {
        self.retired.remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.retired.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.retired.len()
    }

    /// Drop every retired group. Returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let dropped = self.retired.len();
        self.retired.clear();
        dropped
    }
}
