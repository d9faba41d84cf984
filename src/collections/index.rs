// ============================================================================
// spark-lookup - OrderedIndex
// Comparator-ordered map from key to live group
// ============================================================================
//
// A `BTreeMap` gives O(log n) insert / lookup / remove and in-order
// traversal. `BTreeMap` orders by `Ord`, so each stored key is wrapped in a
// `SortKey` that carries the lookup's comparator and implements `Ord` by
// calling it. Probing with a borrowed `&K` therefore clones the key once.
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::rc::Rc;

use crate::collections::group::ObservableGroup;
use crate::core::types::Comparator;

// =============================================================================
// SORT KEY
// =============================================================================

struct SortKey<K> {
    key: K,
    order: Comparator<K>,
}

impl<K> PartialEq for SortKey<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for SortKey<K> {}

impl<K> PartialOrd for SortKey<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for SortKey<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.order)(&self.key, &other.key)
    }
}

// =============================================================================
// ORDERED INDEX
// =============================================================================

/// Owns the live groups of a lookup, one per key, in comparator order.
pub(crate) struct OrderedIndex<K, T> {
    order: Comparator<K>,
    groups: BTreeMap<SortKey<K>, Rc<ObservableGroup<K, T>>>,
}

impl<K: Clone, T> OrderedIndex<K, T> {
    pub fn new(order: Comparator<K>) -> Self {
        Self {
            order,
            groups: BTreeMap::new(),
        }
    }

    pub fn comparator(&self) -> &Comparator<K> {
        &self.order
    }

    fn probe(&self, key: &K) -> SortKey<K> {
        SortKey {
            key: key.clone(),
            order: self.order.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&Rc<ObservableGroup<K, T>>> {
        self.groups.get(&self.probe(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.groups.contains_key(&self.probe(key))
    }

    /// Fetch the live group for `key`, or insert the one `make` produces.
    ///
    /// Returns the group and whether it was newly inserted.
    pub fn ensure_with(
        &mut self,
        key: &K,
        make: impl FnOnce() -> Rc<ObservableGroup<K, T>>,
    ) -> (Rc<ObservableGroup<K, T>>, bool) {
        if let Some(group) = self.get(key) {
            return (group.clone(), false);
        }
        let group = make();
        self.insert(group.clone());
        (group, true)
    }

    /// Insert `group` under its own key.
    ///
    /// Returns the group previously stored for an equal key, if any.
    pub fn insert(
        &mut self,
        group: Rc<ObservableGroup<K, T>>,
    ) -> Option<Rc<ObservableGroup<K, T>>> {
        let key = self.probe(group.key());
        self.groups.insert(key, group)
    }

    pub fn remove(&mut self, key: &K) -> Option<Rc<ObservableGroup<K, T>>> {
        self.groups.remove(&self.probe(key))
    }

    /// Take every group out, in order.
    pub fn take_all(&mut self) -> Vec<Rc<ObservableGroup<K, T>>> {
        std::mem::take(&mut self.groups).into_values().collect()
    }

    /// Number of indexed keys comparing strictly greater than `key`.
    pub fn count_greater(&self, key: &K) -> usize {
        self.groups
            .range((Bound::Excluded(self.probe(key)), Bound::Unbounded))
            .count()
    }

    /// Group at `index` in comparator order.
    pub fn nth(&self, index: usize) -> Option<&Rc<ObservableGroup<K, T>>> {
        self.groups.values().nth(index)
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &Rc<ObservableGroup<K, T>>> + ExactSizeIterator {
        self.groups.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys().map(|k| &k.key)
    }
}

// =============================================================================
// TESTS
// =============================================================================
