//! Storage traits for price records and provider assignments.
//!
//! These traits abstract the persistence layer; the real database lives
//! with the embedding application. In-memory implementations for tests
//! and small embedders are in [`memory`].
//!
//! # Design Notes
//!
//! - Async methods are used for mutations that may involve I/O
//! - Sync methods are used for simple queries that are typically fast
//! - Price records are keyed by `(asset_id, day)`: at most one record per
//!   asset per day, writes are upserts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{AssetId, Day, PriceRecord, ProviderCode, ProviderParams};

pub mod memory;

pub use memory::{MemoryAssignmentStore, MemoryPriceStore};

/// Binding of an asset to the provider that values it.
///
/// Created explicitly via `assign_provider` or auto-created on first
/// valuation of a scheduled-yield asset. Updated in place; never deleted
/// as a side effect of valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAssignment {
    pub asset_id: AssetId,
    pub provider_code: ProviderCode,
    /// Opaque parameter bag owned by the assigned provider.
    pub params: ProviderParams,
    pub assigned_at: DateTime<Utc>,
}

impl ProviderAssignment {
    pub fn new(asset_id: AssetId, provider_code: ProviderCode, params: ProviderParams) -> Self {
        Self {
            asset_id,
            provider_code,
            params,
            assigned_at: Utc::now(),
        }
    }
}

/// Storage interface for daily price records.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Upsert records keyed by `(asset_id, day)`.
    ///
    /// With `overwrite = false` existing rows win and the incoming record
    /// for an occupied key is dropped; with `overwrite = true` incoming
    /// records replace existing rows. Returns the number of rows written.
    async fn save_records(&self, records: &[PriceRecord], overwrite: bool) -> Result<usize>;

    /// The most recent record for the asset on or before `day`.
    fn latest_on_or_before(&self, asset_id: &AssetId, day: Day) -> Result<Option<PriceRecord>>;

    /// Records for the asset within `[start, end]`, ascending by day.
    fn range(&self, asset_id: &AssetId, start: Day, end: Day) -> Result<Vec<PriceRecord>>;
}

/// Storage interface for provider assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// The current assignment for an asset, if any.
    fn get(&self, asset_id: &AssetId) -> Result<Option<ProviderAssignment>>;

    /// Insert or replace the assignment for `assignment.asset_id`.
    async fn save(&self, assignment: &ProviderAssignment) -> Result<()>;
}
