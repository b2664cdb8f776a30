//! Domain models for the valuation engine.

mod asset;
mod params;
mod price;
mod search;
mod types;

pub use asset::{Asset, InterestPeriod, LateInterestTerms, ScheduledYieldTerms, ValuationModel};
pub use params::ProviderParams;
pub use price::{BackfillInfo, PricePoint, PriceRecord, ValuationResult};
pub use search::SearchResult;
pub use types::{days_between, AssetId, Currency, Day, ProviderCode};
