// ============================================================================
// spark-lookup - Change Router
//
// Turns structural mutations of a lookup into change notifications.
// ============================================================================
//
// Two channels:
// 1. Collection changes: Add / Remove / Reset, carrying the group and its
//    reported position. This is what list-rendering layers consume.
// 2. Property changes: Count / Indexer, for consumers bound to summary
//    values. Whether this channel is live is the `NotifyPolicy`.
//
// Position convention: the position of a key is the number of live keys
// that compare strictly greater than it, i.e. its distance from the tail
// of the ordering. The first key of an ascending lookup therefore reports
// `len - 1`, the last one reports `0`.
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::collections::group::ObservableGroup;
use crate::collections::index::OrderedIndex;
use crate::core::types::SubscriptionId;
use crate::reactivity::observers::Observers;

// =============================================================================
// EVENTS
// =============================================================================

/// Discriminant of a [`LookupChange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Add,
    Remove,
    Reset,
}

/// A structural change of a lookup.
pub enum LookupChange<K, T> {
    /// A key became live.
    Add {
        group: Rc<ObservableGroup<K, T>>,
        position: usize,
    },
    /// A key stopped being live.
    Remove {
        group: Rc<ObservableGroup<K, T>>,
        position: usize,
    },
    /// Everything changed; drop positional state and re-enumerate.
    Reset,
}

impl<K, T> LookupChange<K, T> {
    pub fn action(&self) -> ChangeAction {
        match self {
            LookupChange::Add { .. } => ChangeAction::Add,
            LookupChange::Remove { .. } => ChangeAction::Remove,
            LookupChange::Reset => ChangeAction::Reset,
        }
    }

    /// The affected group. `None` for `Reset`.
    pub fn group(&self) -> Option<&Rc<ObservableGroup<K, T>>> {
        match self {
            LookupChange::Add { group, .. } | LookupChange::Remove { group, .. } => Some(group),
            LookupChange::Reset => None,
        }
    }

    /// The reported (tail-counted) position. `None` for `Reset`.
    pub fn position(&self) -> Option<usize> {
        match self {
            LookupChange::Add { position, .. } | LookupChange::Remove { position, .. } => {
                Some(*position)
            }
            LookupChange::Reset => None,
        }
    }
}

impl<K: fmt::Debug, T> fmt::Debug for LookupChange<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupChange::Add { group, position } => f
                .debug_struct("Add")
                .field("key", group.key())
                .field("position", position)
                .finish(),
            LookupChange::Remove { group, position } => f
                .debug_struct("Remove")
                .field("key", group.key())
                .field("position", position)
                .finish(),
            LookupChange::Reset => f.write_str("Reset"),
        }
    }
}

/// Aggregate values of a lookup that changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupProperty {
    /// Number of live groups.
    Count,
    /// Key-indexed / ordinal access results.
    Indexer,
}

impl LookupProperty {
    /// Binding name of the property.
    pub fn name(self) -> &'static str {
        match self {
            LookupProperty::Count => "Count",
            LookupProperty::Indexer => "Item[]",
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Which notification surface a lookup exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Collection changes only.
    CollectionOnly,
    /// Collection changes plus `Count`/`Indexer` property changes.
    #[default]
    WithProperties,
}

impl NotifyPolicy {
    pub fn from_flag(property_notifications: bool) -> Self {
        if property_notifications {
            NotifyPolicy::WithProperties
        } else {
            NotifyPolicy::CollectionOnly
        }
    }

    pub fn emits_properties(self) -> bool {
        self == NotifyPolicy::WithProperties
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Packages index mutations into events and delivers them.
pub(crate) struct ChangeRouter<K, T> {
    policy: NotifyPolicy,
    changes: Observers<LookupChange<K, T>>,
    properties: Observers<LookupProperty>,
}

impl<K: Clone, T> ChangeRouter<K, T> {
    pub fn new(policy: NotifyPolicy) -> Self {
        Self {
            policy,
            changes: Observers::new(),
            properties: Observers::new(),
        }
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: NotifyPolicy) {
        self.policy = policy;
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&LookupChange<K, T>) + 'static,
    ) -> SubscriptionId {
        self.changes.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    pub fn subscribe_properties(
        &mut self,
        observer: impl FnMut(&LookupProperty) + 'static,
    ) -> SubscriptionId {
        self.properties.subscribe(observer)
    }

    pub fn unsubscribe_properties(&mut self, id: SubscriptionId) -> bool {
        self.properties.unsubscribe(id)
    }

    pub fn change_observer_count(&self) -> usize {
        self.changes.len()
    }

    pub fn property_observer_count(&self) -> usize {
        self.properties.len()
    }

    /// Position reported for `key`: live keys strictly greater than it.
    pub fn position_of(index: &OrderedIndex<K, T>, key: &K) -> usize {
        index.count_greater(key)
    }

    /// `group` was just inserted into `index`.
    pub fn group_added(&mut self, index: &OrderedIndex<K, T>, group: &Rc<ObservableGroup<K, T>>) {
        self.structure_changed();
        if self.changes.is_empty() {
            return;
        }
        let position = Self::position_of(index, group.key());
        self.changes.notify(&LookupChange::Add {
            group: group.clone(),
            position,
        });
    }

    /// `group` was just taken out of `index`.
    ///
    /// The removed key is not strictly greater than itself, so counting
    /// against the post-removal index yields the pre-removal position.
    pub fn group_removed(
        &mut self,
        index: &OrderedIndex<K, T>,
        group: &Rc<ObservableGroup<K, T>>,
    ) {
        self.structure_changed();
        if self.changes.is_empty() {
            return;
        }
        let position = Self::position_of(index, group.key());
        self.changes.notify(&LookupChange::Remove {
            group: group.clone(),
            position,
        });
    }

    /// The whole index was cleared.
    pub fn reset(&mut self) {
        self.property_changed(LookupProperty::Count);
        self.changes.notify(&LookupChange::Reset);
    }

    fn structure_changed(&mut self) {
        self.property_changed(LookupProperty::Count);
        self.property_changed(LookupProperty::Indexer);
    }

    fn property_changed(&mut self, property: LookupProperty) {
        if self.policy.emits_properties() {
            self.properties.notify(&property);
        }
    }
}

impl<K, T> fmt::Debug for ChangeRouter<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeRouter")
            .field("policy", &self.policy)
            .field("changes", &self.changes)
            .field("properties", &self.properties)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
