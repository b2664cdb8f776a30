//! Search result model for providers that support instrument lookup.

use serde::{Deserialize, Serialize};

use super::types::Currency;

/// A candidate instrument returned by a provider search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Provider-side symbol to use in assignment parameters.
    pub symbol: String,
    /// Human-readable instrument name.
    pub name: String,
    /// Quote currency, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Provider code the candidate came from.
    pub source: String,
}
