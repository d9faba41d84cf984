// ============================================================================
// spark-lookup - Type Definitions
// Comparators and subscription handles shared by every collection
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// COMPARATOR
// =============================================================================
//
// Keys are ordered by an injected comparator instead of `Ord` so that the
// same key type can be laid out differently per lookup (ascending,
// descending, by a projected field...).
//
// The comparator is shared (`Rc`) because every key stored in the ordered
// index carries a handle to it.
// =============================================================================

/// Total-order function over keys.
pub type Comparator<K> = Rc<dyn Fn(&K, &K) -> Ordering>;

/// Comparator following the key type's natural `Ord`.
///
/// # Example
///
/// ```
/// use spark_lookup::natural_order;
/// use std::cmp::Ordering;
///
/// let cmp = natural_order::<i32>();
/// assert_eq!(cmp(&1, &2), Ordering::Less);
/// ```
pub fn natural_order<K: Ord + 'static>() -> Comparator<K> {
    Rc::new(|a: &K, b: &K| a.cmp(b))
}

/// Comparator reversing the key type's natural `Ord`.
///
/// # Example
///
/// ```
/// use spark_lookup::reverse_order;
/// use std::cmp::Ordering;
///
/// let cmp = reverse_order::<i32>();
/// assert_eq!(cmp(&1, &2), Ordering::Greater);
/// ```
pub fn reverse_order<K: Ord + 'static>() -> Comparator<K> {
    Rc::new(|a: &K, b: &K| b.cmp(a))
}

/// Wrap a closure as a [`Comparator`].
pub fn comparator<K, F>(f: F) -> Comparator<K>
where
    F: Fn(&K, &K) -> Ordering + 'static,
{
    Rc::new(f)
}

// =============================================================================
// SUBSCRIPTION ID
// =============================================================================

/// Handle returned by `subscribe`, used to unsubscribe later.
///
/// Ids are unique per observer list, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
