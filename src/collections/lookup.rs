// ============================================================================
// spark-lookup - ObservableLookup
// An ordered one-to-many index that reports key-level changes
// ============================================================================
//
// Layers, leaf first:
// - ObservableGroup: the elements under one key (element-level changes)
// - OrderedIndex:    live groups in comparator order
// - RecyclePool:     retired groups kept for identity reuse (optional)
// - ChangeRouter:    Add / Remove / Reset + Count / Indexer notifications
//
// Only a key becoming live or ceasing to be live is reported here. Pushing
// into or removing from an already-live group is silent at this level;
// observe the group itself for that.
// ============================================================================

use std::fmt;
use std::hash::Hash;
use std::ops::Index;
use std::rc::Rc;

use tracing::trace;

use crate::collections::group::ObservableGroup;
use crate::collections::grouping::Grouping;
use crate::collections::index::OrderedIndex;
use crate::collections::pool::RecyclePool;
use crate::core::error::LookupError;
use crate::core::options::LookupOptions;
use crate::core::types::{natural_order, Comparator, SubscriptionId};
use crate::reactivity::router::{ChangeRouter, LookupChange, LookupProperty, NotifyPolicy};

// =============================================================================
// OBSERVABLE LOOKUP
// =============================================================================

/// A mutable lookup from unique keys to ordered groups of elements.
///
/// Groups are enumerated in comparator order. Every key-level structural
/// change is reported to subscribers:
/// - a key becoming live: `Add { group, position }`
/// - a key being removed: `Remove { group, position }`
/// - `clear()`: a single `Reset`
///
/// `position` counts the live keys ordered strictly *after* the affected
/// key (distance from the tail), see [`position_of`](Self::position_of).
///
/// # Keys
///
/// Ordering comes from the comparator; recycling matches keys with `Eq` /
/// `Hash`. The two must agree (`cmp(a, b) == Equal` exactly when `a == b`),
/// otherwise a returning key can miss its retired group.
///
/// # Reentrancy
///
/// Notifications are delivered synchronously inside the mutating call, in
/// subscription order. Mutating the lookup from a subscriber is not
/// supported: `&mut self` is held for the whole call, so it cannot happen
/// without a `RefCell`, which then reports the double borrow.
///
/// # Example
///
/// ```
/// use spark_lookup::{ChangeAction, ObservableLookup};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut lookup: ObservableLookup<i32, &str> = ObservableLookup::new();
/// let events = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = events.clone();
/// lookup.subscribe(move |change| sink.borrow_mut().push((change.action(), change.position())));
///
/// lookup.add(3, "a");
/// lookup.add(1, "b");
/// lookup.add(3, "c"); // existing key: no event
///
/// assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
/// assert_eq!(lookup[&3].to_vec(), vec!["a", "c"]);
/// assert_eq!(lookup.len(), 2);
/// assert_eq!(
///     *events.borrow(),
///     vec![(ChangeAction::Add, Some(0)), (ChangeAction::Add, Some(1))]
/// );
/// ```
pub struct ObservableLookup<K, T> {
    index: OrderedIndex<K, T>,
    pool: Option<RecyclePool<K, T>>,
    router: ChangeRouter<K, T>,
}

impl<K, T> ObservableLookup<K, T>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty lookup ordered by `K`'s natural order.
    pub fn new() -> Self
    where
        K: Ord + 'static,
    {
        Self::with_comparator_and_options(natural_order(), LookupOptions::default())
    }

    /// Create an empty lookup ordered by `comparator`.
    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        Self::with_comparator_and_options(comparator, LookupOptions::default())
    }

    /// Create an empty lookup with natural ordering and the given options.
    pub fn with_options(options: LookupOptions) -> Self
    where
        K: Ord + 'static,
    {
        Self::with_comparator_and_options(natural_order(), options)
    }

    pub fn with_comparator_and_options(comparator: Comparator<K>, options: LookupOptions) -> Self {
        Self {
            index: OrderedIndex::new(comparator),
            pool: options.reuse_groups.then(RecyclePool::new),
            router: ChangeRouter::new(NotifyPolicy::from_flag(options.property_notifications)),
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn comparator(&self) -> &Comparator<K> {
        self.index.comparator()
    }

    /// Current options, reflecting any runtime toggles.
    pub fn options(&self) -> LookupOptions {
        LookupOptions {
            reuse_groups: self.reuse_groups(),
            property_notifications: self.property_notifications(),
        }
    }

    pub fn reuse_groups(&self) -> bool {
        self.pool.is_some()
    }

    /// Turn group recycling on or off.
    ///
    /// Turning it on starts an empty pool; live groups are untouched.
    /// Turning it off drops every retired group for good.
    pub fn set_reuse_groups(&mut self, enabled: bool) {
        if enabled == self.pool.is_some() {
            return;
        }
        if enabled {
            self.pool = Some(RecyclePool::new());
            trace!("recycle pool enabled");
        } else {
            let dropped = self.pool.take().map_or(0, |pool| pool.len());
            trace!(dropped, "recycle pool discarded");
        }
    }

    pub fn property_notifications(&self) -> bool {
        self.router.policy().emits_properties()
    }

    pub fn set_property_notifications(&mut self, enabled: bool) {
        self.router.set_policy(NotifyPolicy::from_flag(enabled));
    }

    pub fn notify_policy(&self) -> NotifyPolicy {
        self.router.policy()
    }

    // =========================================================================
    // SIZE
    // =========================================================================

    /// Number of live groups.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // =========================================================================
    // ADD
    // =========================================================================

    /// Take the retired group for `key` if recycling has one, else build one.
    fn obtain(pool: &mut Option<RecyclePool<K, T>>, key: &K) -> Rc<ObservableGroup<K, T>> {
        if let Some(pool) = pool.as_mut() {
            if let Some(group) = pool.revive(key) {
                trace!(retired = pool.len(), "group revived");
                return group;
            }
        }
        Rc::new(ObservableGroup::new(key.clone()))
    }

    /// Add `element` under `key`.
    ///
    /// A new key is inserted and reported (`Add`) before the element is
    /// appended, so subscribers observe the group while it is still empty.
    /// An existing key just gets the element appended, silently.
    pub fn add(&mut self, key: K, element: T) {
        let (group, created) = self
            .index
            .ensure_with(&key, || Self::obtain(&mut self.pool, &key));
        if created {
            trace!(len = self.index.len(), "group added");
            self.router.group_added(&self.index, &group);
        }
        group.push(element);
    }

    /// Add every element of `elements` under `key`.
    ///
    /// For a new key the group is filled first; if it ends up empty the key
    /// never becomes live and nothing is reported.
    pub fn add_all<I>(&mut self, key: K, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        if let Some(group) = self.index.get(&key) {
            group.extend(elements);
            return;
        }

        let group = Self::obtain(&mut self.pool, &key);
        group.extend(elements);

        if group.is_empty() {
            if let Some(pool) = self.pool.as_mut() {
                pool.restore(group);
            }
            trace!("empty group not added");
            return;
        }

        self.index.insert(group.clone());
        trace!(len = self.index.len(), elements = group.len(), "group added");
        self.router.group_added(&self.index, &group);
    }

    /// Add a pre-grouped key and elements. Same as [`add_all`](Self::add_all).
    pub fn add_grouping(&mut self, grouping: Grouping<K, T>) {
        let (key, elements) = grouping.into_parts();
        self.add_all(key, elements);
    }

    // =========================================================================
    // REMOVE
    // =========================================================================

    /// Remove the first element equal to `element` from `key`'s group.
    ///
    /// The key stays live even if its group becomes empty, and nothing is
    /// reported at lookup level. Returns whether an element was removed.
    pub fn remove_element(&mut self, key: &K, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.index
            .get(key)
            .is_some_and(|group| group.remove_first(element))
    }

    /// Remove `key` and its group. Returns whether the key was live.
    ///
    /// With recycling on, the group is emptied and kept for reuse.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(group) = self.index.remove(key) else {
            return false;
        };
        if let Some(pool) = self.pool.as_mut() {
            pool.retire(group.clone());
            trace!(len = self.index.len(), retired = pool.len(), "group retired");
        } else {
            trace!(len = self.index.len(), "group removed");
        }
        self.router.group_removed(&self.index, &group);
        true
    }

    /// Remove every key. Reports one `Reset`, never per-key removals.
    ///
    /// With recycling on, every group is emptied and retired under its key.
    pub fn clear(&mut self) {
        let groups = self.index.take_all();
        let cleared = groups.len();
        if let Some(pool) = self.pool.as_mut() {
            for group in groups {
                pool.retire(group);
            }
            trace!(cleared, retired = pool.len(), "lookup reset");
        } else {
            trace!(cleared, "lookup reset");
        }
        self.router.reset();
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// Elements under `key` and whether the key is live. Never fails:
    /// an absent key yields `(vec![], false)`.
    pub fn try_get_values(&self, key: &K) -> (Vec<T>, bool)
    where
        T: Clone,
    {
        match self.index.get(key) {
            Some(group) => (group.to_vec(), true),
            None => (Vec::new(), false),
        }
    }

    /// Elements under `key`, empty when the key is absent.
    pub fn values(&self, key: &K) -> Vec<T>
    where
        T: Clone,
    {
        self.try_get_values(key).0
    }

    /// The live group for `key`.
    pub fn get(&self, key: &K) -> Option<&Rc<ObservableGroup<K, T>>> {
        self.index.get(key)
    }

    /// The live group for `key`, or [`LookupError::KeyNotFound`].
    pub fn group(&self, key: &K) -> Result<&Rc<ObservableGroup<K, T>>, LookupError> {
        self.index.get(key).ok_or(LookupError::KeyNotFound)
    }

    /// The group at `index` in comparator order, or
    /// [`LookupError::IndexOutOfRange`].
    pub fn at(&self, index: usize) -> Result<&Rc<ObservableGroup<K, T>>, LookupError> {
        self.index.nth(index).ok_or(LookupError::IndexOutOfRange {
            index,
            len: self.index.len(),
        })
    }

    /// Whether `key` is live. Retired keys don't count.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Position reported in change events for `key`: the number of live
    /// keys comparing strictly greater than it.
    ///
    /// ```
    /// use spark_lookup::ObservableLookup;
    ///
    /// let mut lookup: ObservableLookup<char, u8> = ObservableLookup::new();
    /// for key in ['a', 'b', 'c'] {
    ///     lookup.add(key, 0);
    /// }
    /// assert_eq!(lookup.position_of(&'a'), 2);
    /// assert_eq!(lookup.position_of(&'c'), 0);
    /// ```
    pub fn position_of(&self, key: &K) -> usize {
        ChangeRouter::position_of(&self.index, key)
    }

    /// Live keys in comparator order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }

    /// Live groups in comparator order.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &Rc<ObservableGroup<K, T>>> + ExactSizeIterator {
        self.index.iter()
    }

    /// Handles to the live groups in comparator order.
    pub fn groups(&self) -> Vec<Rc<ObservableGroup<K, T>>> {
        self.index.iter().cloned().collect()
    }

    // =========================================================================
    // RECYCLE POOL
    // =========================================================================

    /// Number of retired groups held for reuse.
    pub fn retired_len(&self) -> usize {
        self.pool.as_ref().map_or(0, |pool| pool.len())
    }

    pub fn is_retired(&self, key: &K) -> bool {
        self.pool.as_ref().is_some_and(|pool| pool.contains(key))
    }

    /// Drop every retired group while keeping recycling on.
    ///
    /// The pool never shrinks by itself; call this to bound it.
    pub fn purge_retired(&mut self) -> usize {
        let dropped = self.pool.as_mut().map_or(0, |pool| pool.purge());
        trace!(dropped, "recycle pool purged");
        dropped
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Observe key-level changes (`Add` / `Remove` / `Reset`).
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&LookupChange<K, T>) + 'static,
    ) -> SubscriptionId {
        self.router.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.router.unsubscribe(id)
    }

    /// Observe `Count` / `Indexer` changes.
    ///
    /// Only delivered while property notifications are enabled.
    pub fn subscribe_properties(
        &mut self,
        observer: impl FnMut(&LookupProperty) + 'static,
    ) -> SubscriptionId {
        self.router.subscribe_properties(observer)
    }

    pub fn unsubscribe_properties(&mut self, id: SubscriptionId) -> bool {
        self.router.unsubscribe_properties(id)
    }

    /// Number of (change, property) subscribers.
    pub fn observer_counts(&self) -> (usize, usize) {
        (
            self.router.change_observer_count(),
            self.router.property_observer_count(),
        )
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl<K, T> Default for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash + Ord + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Index<&K> for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash,
{
    type Output = ObservableGroup<K, T>;

    /// Panics with [`LookupError::KeyNotFound`]; use [`group`](ObservableLookup::group)
    /// for a `Result`.
    fn index(&self, key: &K) -> &Self::Output {
        match self.group(key) {
            Ok(group) => group,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, T> Index<usize> for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash,
{
    type Output = ObservableGroup<K, T>;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(group) => group,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, T> Extend<(K, T)> for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, element) in iter {
            self.add(key, element);
        }
    }
}

impl<K, T> FromIterator<(K, T)> for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash + Ord + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        lookup.extend(iter);
        lookup
    }
}

impl<K, T> fmt::Debug for ObservableLookup<K, T>
where
    K: Clone + Eq + Hash + fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableLookup")
            .field("groups", &self.index.iter().collect::<Vec<_>>())
            .field("len", &self.index.len())
            .field("retired", &self.retired_len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
