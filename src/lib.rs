//! Valuation Engine
//!
//! This crate provides provider-agnostic asset valuation for portfolio
//! applications: observed market prices and synthetically computed values
//! behind one contract.
//!
//! # Overview
//!
//! The valuation engine supports:
//! - Pluggable providers addressed by code through an immutable registry
//! - Synthetic valuation of scheduled-yield instruments (loans, bonds,
//!   notes) from their contractual terms, ACT/365 fixed
//! - Observed market data with daily persistence and carry-forward
//!   backfill
//! - Bulk refresh with bounded concurrency and per-asset attribution
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +---------------------+
//! |      Asset       | --> | ProviderAssignment  |  (code + params)
//! +------------------+     +---------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          | ProviderRegistry |  (code -> provider)
//!                          +------------------+
//!                                    |
//!                                    v
//!                         +----------------------+
//!                         |  ValuationProvider   |  (synthetic or market)
//!                         +----------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          |    PricePoint    |  (bare day/value)
//!                          +------------------+
//!                                    |
//!                                    v
//!                          +------------------+
//!                          | ValuationResult  |  (backfill-aware)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Asset`] - The valuation-relevant slice of an asset
//! - [`ScheduledYieldTerms`] - Contractual terms driving synthetic values
//! - [`ProviderParams`] - Opaque per-assignment parameter bag
//! - [`PricePoint`] / [`PriceRecord`] - Provider output and persisted row
//! - [`ValuationResult`] - Uniform answer shape with backfill marking
//! - [`AssetId`] / [`ProviderCode`] / [`Day`] / [`Currency`] - Strong
//!   identifier types

pub mod accrual;
pub mod errors;
pub mod manager;
pub mod models;
pub mod provider;
pub mod registry;
pub mod store;

// Re-export all public types from models
pub use models::{
    Asset, AssetId, BackfillInfo, Currency, Day, InterestPeriod, LateInterestTerms, PricePoint,
    PriceRecord, ProviderCode, ProviderParams, ScheduledYieldTerms, SearchResult,
    ValuationModel, ValuationResult,
};

// Re-export error types
pub use errors::{Result, RetryClass, ValuationError};

// Re-export provider types
pub use provider::{
    ProviderCapabilities, QuoteApiProvider, ScheduledYieldProvider, ValuationProvider,
};

// Re-export registry types
pub use registry::{ProviderInfo, ProviderRegistry, RegistryBuilder};

// Re-export store types
pub use store::{
    AssignmentStore, MemoryAssignmentStore, MemoryPriceStore, PriceStore, ProviderAssignment,
};

// Re-export manager types
pub use manager::{RefreshError, RefreshSummary, ValuationService};
