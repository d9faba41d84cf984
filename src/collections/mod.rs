// ============================================================================
// spark-lookup - Collections
// Groups, the ordered index, the recycle pool and the lookup built on them
// ============================================================================
//
// Two levels of notification:
//
// 1. Group level: every group reports its own element changes
// 2. Lookup level: keys becoming live / being removed / everything reset
//
// The levels are independent; element churn inside a live group never
// produces a lookup-level event.
// ============================================================================

pub mod group;
pub mod grouping;
pub(crate) mod index;
pub mod lookup;
pub(crate) mod pool;

pub use group::{GroupChange, ObservableGroup};
pub use grouping::{group_by, Grouping, ToLookup};
pub use lookup::ObservableLookup;
