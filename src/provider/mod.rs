//! Valuation providers.
//!
//! The [`ValuationProvider`] trait is the plugin seam of the engine:
//! synthetic calculators and market data fetchers implement the same
//! contract and are addressed uniformly through the registry.

mod capabilities;
pub mod quote_api;
pub mod scheduled_yield;
mod traits;

pub use capabilities::ProviderCapabilities;
pub use quote_api::QuoteApiProvider;
pub use scheduled_yield::ScheduledYieldProvider;
pub use traits::ValuationProvider;
