//! Provider capability descriptors.

/// Describes what a valuation provider can do.
///
/// Used by the registry for discovery listings and by the manager to
/// decide persistence behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Whether the provider computes values purely from parameters.
    ///
    /// Synthetic providers perform no I/O and their outputs are never
    /// persisted; every request recomputes from current terms.
    pub synthetic: bool,

    /// Whether the provider can serve historical date ranges.
    pub supports_historical: bool,

    /// Whether the provider supports instrument search.
    pub supports_search: bool,
}
