// ============================================================================
// spark-lookup - An Observable Lookup for Rust
// ============================================================================
//
// A mutable, ordered one-to-many index (key -> group of elements) that
// reports structural changes so list-rendering layers can patch instead of
// rebuild. Single-threaded, synchronous, Rc-based like the rest of spark.
// ============================================================================

pub mod collections;
pub mod core;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use self::core::error::LookupError;
pub use self::core::options::LookupOptions;
pub use self::core::types::{comparator, natural_order, reverse_order, Comparator, SubscriptionId};

// Re-export collections
pub use collections::{
    group_by, GroupChange, Grouping, ObservableGroup, ObservableLookup, ToLookup,
};

// Re-export notification types
pub use reactivity::{ChangeAction, LookupChange, LookupProperty, NotifyPolicy, Observers};

// =============================================================================
// TESTS
// =============================================================================
