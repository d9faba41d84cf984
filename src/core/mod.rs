// ============================================================================
// spark-lookup - Core Module
// Comparators, subscription handles and errors
// ============================================================================

pub mod error;
pub mod options;
pub mod types;

// Re-export commonly used items
pub use error::LookupError;
pub use options::LookupOptions;
pub use types::{comparator, natural_order, reverse_order, Comparator, SubscriptionId};
