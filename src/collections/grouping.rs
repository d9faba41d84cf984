// ============================================================================
// spark-lookup - Grouping
// Key + elements pairs, and building lookups from plain sequences
// ============================================================================

use std::hash::Hash;

use indexmap::IndexMap;

use crate::collections::lookup::ObservableLookup;
use crate::core::types::{natural_order, Comparator};

// =============================================================================
// GROUPING
// =============================================================================

/// A key together with the elements that belong to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping<K, T> {
    key: K,
    elements: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub fn new(key: K, elements: Vec<T>) -> Self {
        Self { key, elements }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.elements)
    }
}

impl<K, T> From<(K, Vec<T>)> for Grouping<K, T> {
    fn from((key, elements): (K, Vec<T>)) -> Self {
        Self::new(key, elements)
    }
}

/// Group `source` by `key_fn`.
///
/// Groups come out in order of first appearance of their key; elements
/// keep their source order inside a group.
///
/// ```
/// use spark_lookup::group_by;
///
/// let groups = group_by(["apple", "bean", "avocado"], |s| s.as_bytes()[0]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].elements(), &["apple", "avocado"]);
/// ```
pub fn group_by<I, K, F>(source: I, mut key_fn: F) -> Vec<Grouping<K, I::Item>>
where
    I: IntoIterator,
    K: Eq + Hash,
    F: FnMut(&I::Item) -> K,
{
    let mut groups: IndexMap<K, Vec<I::Item>> = IndexMap::new();
    for item in source {
        groups.entry(key_fn(&item)).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(key, elements)| Grouping::new(key, elements))
        .collect()
}

// =============================================================================
// TO LOOKUP
// =============================================================================

/// Build an [`ObservableLookup`] from any sequence.
///
/// ```
/// use spark_lookup::ToLookup;
///
/// let words = vec!["kiwi", "fig", "lime", "pear"];
/// let by_len = words.to_lookup(|w| w.len());
///
/// assert_eq!(by_len.keys().copied().collect::<Vec<_>>(), vec![3, 4]);
/// assert_eq!(by_len.values(&4), vec!["kiwi", "lime", "pear"]);
/// ```
pub trait ToLookup: IntoIterator + Sized {
    /// Group by `key_fn`, ordering keys naturally.
    fn to_lookup<K, F>(self, key_fn: F) -> ObservableLookup<K, Self::Item>
    where
        K: Clone + Eq + Hash + Ord + 'static,
        F: FnMut(&Self::Item) -> K,
    {
        self.to_lookup_by(natural_order(), key_fn)
    }

    /// Group by `key_fn`, ordering keys with `comparator`.
    fn to_lookup_by<K, F>(self, comparator: Comparator<K>, key_fn: F) -> ObservableLookup<K, Self::Item>
    where
        K: Clone + Eq + Hash,
        F: FnMut(&Self::Item) -> K,
    {
        let mut lookup = ObservableLookup::with_comparator(comparator);
        for grouping in group_by(self, key_fn) {
            lookup.add_grouping(grouping);
        }
        lookup
    }
}

impl<I: IntoIterator> ToLookup for I {}

// =============================================================================
// TESTS
// =============================================================================
