//! In-memory store implementations.
//!
//! Backing storage for tests and embedders that do not bring their own
//! database. A `BTreeMap` keyed by `(asset_id, day)` gives the upsert
//! semantics and ordered range scans the traits require.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::errors::{Result, ValuationError};
use crate::models::{AssetId, Day, PriceRecord};

use super::{AssignmentStore, PriceStore, ProviderAssignment};

fn lock_error() -> ValuationError {
    ValuationError::Store("store lock poisoned".to_string())
}

/// In-memory [`PriceStore`].
#[derive(Default)]
pub struct MemoryPriceStore {
    records: RwLock<BTreeMap<(AssetId, Day), PriceRecord>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records, across all assets.
    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn save_records(&self, records: &[PriceRecord], overwrite: bool) -> Result<usize> {
        let mut map = self.records.write().map_err(|_| lock_error())?;
        let mut written = 0;
        for record in records {
            let key = (record.asset_id.clone(), record.day);
            if overwrite || !map.contains_key(&key) {
                map.insert(key, record.clone());
                written += 1;
            }
        }
        Ok(written)
    }

    fn latest_on_or_before(&self, asset_id: &AssetId, day: Day) -> Result<Option<PriceRecord>> {
        let map = self.records.read().map_err(|_| lock_error())?;
        Ok(map
            .range(..=(asset_id.clone(), day))
            .rev()
            .take_while(|((id, _), _)| id == asset_id)
            .map(|(_, record)| record.clone())
            .next())
    }

    fn range(&self, asset_id: &AssetId, start: Day, end: Day) -> Result<Vec<PriceRecord>> {
        if start > end {
            return Ok(vec![]);
        }
        let map = self.records.read().map_err(|_| lock_error())?;
        Ok(map
            .range((asset_id.clone(), start)..=(asset_id.clone(), end))
            .map(|(_, record)| record.clone())
            .collect())
    }
}

/// In-memory [`AssignmentStore`].
#[derive(Default)]
pub struct MemoryAssignmentStore {
    assignments: RwLock<HashMap<AssetId, ProviderAssignment>>,
}

impl MemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    fn get(&self, asset_id: &AssetId) -> Result<Option<ProviderAssignment>> {
        let map = self.assignments.read().map_err(|_| lock_error())?;
        Ok(map.get(asset_id).cloned())
    }

    async fn save(&self, assignment: &ProviderAssignment) -> Result<()> {
        let mut map = self.assignments.write().map_err(|_| lock_error())?;
        map.insert(assignment.asset_id.clone(), assignment.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, ProviderCode, ProviderParams};
    use rust_decimal_macros::dec;
    use rust_decimal::Decimal;

    fn record(asset: &str, day: Day, value: Decimal) -> PriceRecord {
        PriceRecord {
            asset_id: AssetId::new(asset),
            day,
            value,
            currency: Currency::usd(),
            source: "QUOTE_API".to_string(),
            backfill: None,
        }
    }

    fn day(d: u32) -> Day {
        Day::from_ymd(2025, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_respects_overwrite_flag() {
        let store = MemoryPriceStore::new();
        let original = record("A", day(10), dec!(100));

        assert_eq!(store.save_records(&[original.clone()], false).await.unwrap(), 1);

        // Same key without overwrite: existing row wins.
        let updated = record("A", day(10), dec!(200));
        assert_eq!(store.save_records(&[updated.clone()], false).await.unwrap(), 0);
        assert_eq!(
            store.latest_on_or_before(&AssetId::new("A"), day(10)).unwrap(),
            Some(original)
        );

        // With overwrite the incoming record replaces it.
        assert_eq!(store.save_records(&[updated.clone()], true).await.unwrap(), 1);
        assert_eq!(
            store.latest_on_or_before(&AssetId::new("A"), day(10)).unwrap(),
            Some(updated)
        );
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_latest_on_or_before_skips_other_assets() {
        let store = MemoryPriceStore::new();
        store
            .save_records(
                &[
                    record("A", day(3), dec!(1)),
                    record("A", day(7), dec!(2)),
                    record("B", day(9), dec!(3)),
                ],
                false,
            )
            .await
            .unwrap();

        let found = store
            .latest_on_or_before(&AssetId::new("A"), day(10))
            .unwrap()
            .unwrap();
        assert_eq!(found.day, day(7));

        assert!(store
            .latest_on_or_before(&AssetId::new("A"), day(2))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_range_is_ascending_and_inclusive() {
        let store = MemoryPriceStore::new();
        store
            .save_records(
                &[
                    record("A", day(5), dec!(1)),
                    record("A", day(1), dec!(2)),
                    record("A", day(3), dec!(3)),
                    record("B", day(2), dec!(4)),
                ],
                false,
            )
            .await
            .unwrap();

        let rows = store.range(&AssetId::new("A"), day(1), day(5)).unwrap();
        let days: Vec<Day> = rows.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![day(1), day(3), day(5)]);

        assert!(store.range(&AssetId::new("A"), day(5), day(1)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignment_save_replaces() {
        let store = MemoryAssignmentStore::new();
        let id = AssetId::new("A");

        assert!(store.get(&id).unwrap().is_none());

        let first = ProviderAssignment::new(
            id.clone(),
            ProviderCode::quote_api(),
            ProviderParams::new(),
        );
        store.save(&first).await.unwrap();
        assert_eq!(
            store.get(&id).unwrap().unwrap().provider_code,
            ProviderCode::quote_api()
        );

        let second = ProviderAssignment::new(
            id.clone(),
            ProviderCode::scheduled_yield(),
            ProviderParams::new(),
        );
        store.save(&second).await.unwrap();
        assert_eq!(
            store.get(&id).unwrap().unwrap().provider_code,
            ProviderCode::scheduled_yield()
        );
    }
}
