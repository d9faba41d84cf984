// ============================================================================
// spark-lookup - ObservableGroup
// An ordered, observable run of elements tagged with an immutable key
// ============================================================================
//
// Groups are shared (`Rc`) so the lookup and every UI binding see the same
// object; identity (`Rc::ptr_eq`) is what recycling preserves. Mutation
// goes through `&self`, so the elements live in a `RefCell`.
//
// A group reports its own element-level changes. Those never bubble up to
// the owning lookup: a lookup only speaks about keys appearing/vanishing.
// ============================================================================

use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use crate::core::types::SubscriptionId;
use crate::reactivity::observers::{Observers, ReentrancyFlag};

// =============================================================================
// GROUP CHANGE
// =============================================================================

/// An element-level change of a single group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupChange<T> {
    /// `count` elements were appended starting at `index`.
    Added { index: usize, count: usize },
    /// The element at `index` was removed.
    Removed { index: usize, item: T },
    /// All elements were dropped.
    Reset,
}

// =============================================================================
// OBSERVABLE GROUP
// =============================================================================

/// An ordered sequence of elements sharing one key.
///
/// Duplicates are allowed. A group may be empty and still be live in its
/// lookup; only key-level removal takes it out.
///
/// # Example
///
/// ```
/// use spark_lookup::{GroupChange, ObservableGroup};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let group = ObservableGroup::new("fruit");
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// group.subscribe(move |change: &GroupChange<&str>| sink.borrow_mut().push(change.clone()));
///
/// group.push("apple");
/// group.extend(["pear", "plum"]);
/// assert!(group.remove_first(&"pear"));
///
/// assert_eq!(group.to_vec(), vec!["apple", "plum"]);
/// assert_eq!(
///     *seen.borrow(),
///     vec![
///         GroupChange::Added { index: 0, count: 1 },
///         GroupChange::Added { index: 1, count: 2 },
///         GroupChange::Removed { index: 1, item: "pear" },
///     ]
/// );
/// ```
pub struct ObservableGroup<K, T> {
    key: K,
    items: RefCell<Vec<T>>,
    observers: RefCell<Observers<GroupChange<T>>>,
    // Readable while `observers` is borrowed for delivery
    observer_count: Cell<usize>,
    dispatching: ReentrancyFlag,
}

impl<K, T> ObservableGroup<K, T> {
    /// Create an empty group for `key`.
    pub fn new(key: K) -> Self {
        Self::from_vec(key, Vec::new())
    }

    /// Create a group holding `items`.
    pub fn from_vec(key: K, items: Vec<T>) -> Self {
        Self {
            key,
            items: RefCell::new(items),
            observers: RefCell::new(Observers::new()),
            observer_count: Cell::new(0),
            dispatching: ReentrancyFlag::new(),
        }
    }

    /// The key this group was created for. Never changes.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Borrow the elements.
    ///
    /// Mutating the group while the returned `Ref` is alive panics.
    pub fn items(&self) -> Ref<'_, [T]> {
        Ref::map(self.items.borrow(), |v| v.as_slice())
    }

    /// Run `f` over the elements.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Clone the element at `index`.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.borrow().get(index).cloned()
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.borrow().clone()
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.borrow().contains(item)
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Append one element.
    pub fn push(&self, item: T) {
        self.dispatching.check("push");
        let index = {
            let mut items = self.items.borrow_mut();
            items.push(item);
            items.len() - 1
        };
        self.notify(GroupChange::Added { index, count: 1 });
    }

    /// Append every element of `items`, in order.
    ///
    /// One `Added` change covers the whole batch; nothing is reported when
    /// `items` is empty.
    pub fn extend<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.dispatching.check("extend");
        // Drain the source before borrowing: it may read this group.
        let mut incoming: Vec<T> = items.into_iter().collect();
        if incoming.is_empty() {
            return;
        }
        let count = incoming.len();
        let index = {
            let mut items = self.items.borrow_mut();
            let index = items.len();
            items.append(&mut incoming);
            index
        };
        self.notify(GroupChange::Added { index, count });
    }

    /// Remove the first element equal to `item`.
    ///
    /// Returns whether one was found.
    pub fn remove_first(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.dispatching.check("remove");
        let removed = {
            let mut items = self.items.borrow_mut();
            items
                .iter()
                .position(|candidate| candidate == item)
                .map(|index| (index, items.remove(index)))
        };
        match removed {
            Some((index, item)) => {
                self.notify(GroupChange::Removed { index, item });
                true
            }
            None => false,
        }
    }

    /// Drop every element. Always reports `Reset`.
    pub fn clear(&self) {
        self.dispatching.check("clear");
        self.items.borrow_mut().clear();
        self.notify(GroupChange::Reset);
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Observe element-level changes of this group.
    ///
    /// Callbacks may read the group but must not mutate it or (un)subscribe
    /// on it; doing so panics.
    pub fn subscribe(&self, observer: impl FnMut(&GroupChange<T>) + 'static) -> SubscriptionId {
        self.dispatching.check("subscribe");
        let mut observers = self.observers.borrow_mut();
        let id = observers.subscribe(observer);
        self.observer_count.set(observers.len());
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.dispatching.check("unsubscribe");
        let mut observers = self.observers.borrow_mut();
        let removed = observers.unsubscribe(id);
        self.observer_count.set(observers.len());
        removed
    }

    /// Number of subscribed callbacks. Safe to call from inside one.
    pub fn observer_count(&self) -> usize {
        self.observer_count.get()
    }

    fn notify(&self, change: GroupChange<T>) {
        let mut observers = self.observers.borrow_mut();
        if observers.is_empty() {
            return;
        }
        let _guard = self.dispatching.enter();
        observers.notify(&change);
    }
}

impl<K, T> fmt::Debug for ObservableGroup<K, T>
where
    K: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableGroup")
            .field("key", &self.key)
            .field("items", &*self.items.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorded<K: 'static, T: Clone + 'static>(
        group: &ObservableGroup<K, T>,
    ) -> Rc<RefCell<Vec<GroupChange<T>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        group.subscribe(move |change: &GroupChange<T>| sink.borrow_mut().push(change.clone()));
        log
    }

    #[test]
    fn new_group_is_empty() {
        let group: ObservableGroup<u8, String> = ObservableGroup::new(3);
        assert_eq!(*group.key(), 3);
        assert!(group.is_empty());
        assert_eq!(group.len(), 0);
    }

    #[test]
    fn push_and_extend_keep_order() {
        let group = ObservableGroup::new("k");
        group.push(1);
        group.extend(vec![2, 3]);
        group.push(1);

        assert_eq!(group.to_vec(), vec![1, 2, 3, 1]);
        assert_eq!(group.get(3), Some(1));
        assert_eq!(group.get(4), None);
        assert_eq!(&*group.items(), &[1, 2, 3, 1]);
    }

    #[test]
    fn remove_first_only_takes_first_match() {
        let group = ObservableGroup::from_vec("k", vec!["a", "b", "a"]);
        let log = recorded(&group);

        assert!(group.remove_first(&"a"));
        assert_eq!(group.to_vec(), vec!["b", "a"]);
        assert!(!group.remove_first(&"z"));

        assert_eq!(
            *log.borrow(),
            vec![GroupChange::Removed { index: 0, item: "a" }]
        );
    }

    #[test]
    fn empty_extend_is_silent() {
        let group: ObservableGroup<i32, i32> = ObservableGroup::new(0);
        let log = recorded(&group);
        group.extend(Vec::new());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn clear_reports_reset() {
        let group = ObservableGroup::from_vec(1, vec![1, 2]);
        let log = recorded(&group);
        group.clear();
        assert!(group.is_empty());
        assert_eq!(*log.borrow(), vec![GroupChange::Reset]);
    }

    #[test]
    fn observers_may_read_during_delivery() {
        let group = Rc::new(ObservableGroup::new("k"));
        let lens = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&group);
        let sink = lens.clone();
        group.subscribe(move |_| {
            if let Some(g) = weak.upgrade() {
                sink.borrow_mut().push(g.len());
            }
        });

        group.push(10);
        group.push(20);
        assert_eq!(*lens.borrow(), vec![1, 2]);
    }

    #[test]
    fn observers_may_count_observers_during_delivery() {
        let group = Rc::new(ObservableGroup::new("k"));
        let counts = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&group);
        let sink = counts.clone();
        group.subscribe(move |_| {
            if let Some(g) = weak.upgrade() {
                sink.borrow_mut().push(g.observer_count());
            }
        });
        group.subscribe(|_: &GroupChange<i32>| {});

        group.push(1);
        assert_eq!(*counts.borrow(), vec![2]);
        assert_eq!(group.observer_count(), 2);
    }

    #[test]
    #[should_panic(expected = "reentrant push")]
    fn observer_mutation_panics() {
        let group = Rc::new(ObservableGroup::new("k"));
        let weak = Rc::downgrade(&group);
        group.subscribe(move |_| {
            if let Some(g) = weak.upgrade() {
                g.push(0);
            }
        });
        group.push(1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let group = ObservableGroup::new(());
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = group.subscribe(move |_: &GroupChange<i32>| *c.borrow_mut() += 1);

        group.push(1);
        assert!(group.unsubscribe(id));
        group.push(2);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(group.observer_count(), 0);
    }

    #[test]
    fn debug_format() {
        let group = ObservableGroup::from_vec("k", vec![1]);
        let debug = format!("{:?}", group);
        assert!(debug.contains("ObservableGroup"));
        assert!(debug.contains("\"k\""));
    }
}
