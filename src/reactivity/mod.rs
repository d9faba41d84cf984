// ============================================================================
// spark-lookup - Reactivity Module
// Observer lists and the change router that feeds them
// ============================================================================

pub mod observers;
pub mod router;

pub use observers::{ObserverFn, Observers};
pub use router::{ChangeAction, LookupChange, LookupProperty, NotifyPolicy};
