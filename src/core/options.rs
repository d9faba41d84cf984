// ============================================================================
// spark-lookup - Lookup Options
// Construction-time configuration for ObservableLookup
// ============================================================================

/// Options for creating a lookup.
///
/// Public fields, `Default`, plus chainable setters for the common case:
///
/// ```
/// use spark_lookup::LookupOptions;
///
/// let opts = LookupOptions::new().reuse_groups(true);
/// assert!(opts.reuse_groups);
/// assert!(opts.property_notifications);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupOptions {
    /// Keep emptied groups of removed keys and hand the same group back
    /// when the key is added again. Off by default.
    pub reuse_groups: bool,

    /// Emit `Count`/`Indexer` property notifications next to the
    /// collection changes. On by default.
    pub property_notifications: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            reuse_groups: false,
            property_notifications: true,
        }
    }
}

impl LookupOptions {
    /// Default options: no group reuse, property notifications on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reuse_groups(mut self, enabled: bool) -> Self {
        self.reuse_groups = enabled;
        self
    }

    pub fn property_notifications(mut self, enabled: bool) -> Self {
        self.property_notifications = enabled;
        self
    }
}
