//! Valuation manager: orchestration over providers and stores.
//!
//! [`ValuationService`] is the single entry point for embedders. It owns
//! the request flow: resolve the asset's provider assignment (auto-created
//! for scheduled-yield assets), look the provider up in the registry, call
//! it under a deadline, apply the backfill policy, and persist observed
//! values. Synthetic providers skip persistence entirely; their outputs
//! are recomputed from terms on every request.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{info, warn};

use crate::errors::{Result, ValuationError};
use crate::models::{
    days_between, Asset, AssetId, Day, PriceRecord, ProviderCode, ProviderParams, ValuationModel,
    ValuationResult,
};
use crate::provider::ScheduledYieldProvider;
use crate::registry::{ProviderInfo, ProviderRegistry};
use crate::store::{AssignmentStore, PriceStore, ProviderAssignment};

/// Deadline for a single provider call.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// How far before a requested range the backfill seed may come from.
const LOOKBACK_DAYS: i64 = 30;

/// Concurrent provider calls during a bulk refresh.
const MAX_CONCURRENT_REFRESHES: usize = 4;

/// Error details for one failed asset in a bulk refresh.
#[derive(Debug, Clone)]
pub struct RefreshError {
    /// The asset that failed to refresh.
    pub asset_id: AssetId,
    /// The assigned provider, when the failure happened past assignment
    /// resolution.
    pub provider: Option<ProviderCode>,
    /// Error message.
    pub message: String,
}

/// Aggregate result of a bulk refresh.
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    /// Number of assets successfully refreshed.
    pub refreshed: usize,
    /// Number of assets that failed.
    pub failed: usize,
    /// Detailed errors for each failed asset.
    pub errors: Vec<RefreshError>,
}

impl RefreshSummary {
    /// Whether the refresh completed without failures.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!("Refreshed {} assets successfully", self.refreshed)
        } else {
            format!(
                "Refreshed {} assets with {} failures",
                self.refreshed, self.failed
            )
        }
    }
}

/// Unified valuation service implementation.
pub struct ValuationService<P, A>
where
    P: PriceStore,
    A: AssignmentStore,
{
    /// Provider catalog.
    registry: Arc<ProviderRegistry>,
    /// Price record storage.
    price_store: Arc<P>,
    /// Assignment storage.
    assignment_store: Arc<A>,
    /// Per-call provider deadline.
    provider_timeout: Duration,
}

impl<P, A> ValuationService<P, A>
where
    P: PriceStore,
    A: AssignmentStore,
{
    /// Create a new valuation service.
    pub fn new(registry: Arc<ProviderRegistry>, price_store: Arc<P>, assignment_store: Arc<A>) -> Self {
        Self {
            registry,
            price_store,
            assignment_store,
            provider_timeout: PROVIDER_TIMEOUT,
        }
    }

    /// Override the provider deadline (tests, latency-sensitive embedders).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Discovery listing of registered providers.
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.registry.list()
    }

    /// Bind an asset to a provider.
    ///
    /// The provider must exist in the registry and accept the parameters;
    /// nothing is persisted otherwise. An existing assignment for the
    /// asset is replaced.
    pub async fn assign_provider(
        &self,
        asset_id: AssetId,
        provider_code: ProviderCode,
        params: ProviderParams,
    ) -> Result<ProviderAssignment> {
        let provider = self.registry.get(&provider_code)?;
        provider.validate_params(&params)?;

        let assignment = ProviderAssignment::new(asset_id, provider_code, params);
        self.assignment_store.save(&assignment).await?;
        info!(
            "Assigned provider {} to asset {}",
            assignment.provider_code, assignment.asset_id
        );
        Ok(assignment)
    }

    /// The current value of an asset.
    ///
    /// Observed values are persisted as exact records; existing rows for
    /// the same day win (a forced re-fetch goes through [`Self::refresh`]).
    pub async fn get_current_value(&self, asset: &Asset) -> Result<ValuationResult> {
        let assignment = self.resolve_assignment(asset).await?;
        let provider = self.registry.get(&assignment.provider_code)?;

        let point = self
            .with_deadline(
                &assignment.provider_code,
                provider.current_value(&assignment.params),
            )
            .await?;

        if !provider.capabilities().synthetic {
            let record = PriceRecord::exact(asset.id.clone(), &point);
            self.price_store
                .save_records(std::slice::from_ref(&record), false)
                .await?;
        }

        Ok(ValuationResult::exact(asset.id.clone(), point))
    }

    /// Daily values for `[start, end]`, one result per answerable day.
    ///
    /// Synthetic assets are computed for every day in the range. For
    /// market data the store serves the request and the provider is
    /// consulted only for the uncovered tail; days without an exact
    /// observation carry the most recent prior one forward with
    /// [`crate::models::BackfillInfo`] attached. Days before the first
    /// known observation produce no row.
    pub async fn get_history_value(
        &self,
        asset: &Asset,
        start: Day,
        end: Day,
    ) -> Result<Vec<ValuationResult>> {
        if start > end {
            return Err(ValuationError::InvalidDateRange {
                start: start.date(),
                end: end.date(),
            });
        }

        let assignment = self.resolve_assignment(asset).await?;
        let provider = self.registry.get(&assignment.provider_code)?;

        if provider.capabilities().synthetic {
            let points = self
                .with_deadline(
                    &assignment.provider_code,
                    provider.history_value(&assignment.params, start, end),
                )
                .await?;
            return Ok(points
                .into_iter()
                .map(|point| ValuationResult::exact(asset.id.clone(), point))
                .collect());
        }

        // Stored records serve the request; the provider is consulted for
        // the uncovered head and tail of the range. Gaps between stored
        // records are non-trading days and stay backfilled.
        let stored = self.price_store.range(&asset.id, start, end)?;
        let mut uncovered: Vec<(Day, Day)> = Vec::new();
        if stored.is_empty() {
            uncovered.push((start, end));
        } else {
            let first = stored[0].day;
            let last = stored[stored.len() - 1].day;
            if first > start {
                if let Some(head_end) = first.date().pred_opt().map(Day::new) {
                    uncovered.push((start, head_end));
                }
            }
            if last < end {
                if let Some(tail_start) = last.date().succ_opt().map(Day::new) {
                    uncovered.push((tail_start, end));
                }
            }
        }

        for (from, to) in uncovered {
            let fetched = self
                .with_deadline(
                    &assignment.provider_code,
                    provider.history_value(&assignment.params, from, to),
                )
                .await;
            match fetched {
                Ok(points) => {
                    let records: Vec<PriceRecord> = points
                        .iter()
                        .map(|point| PriceRecord::exact(asset.id.clone(), point))
                        .collect();
                    self.price_store.save_records(&records, false).await?;
                }
                // Degrade to stored data unless there is nothing to serve.
                Err(e) if stored.is_empty() => return Err(e),
                Err(e) => {
                    warn!(
                        "History fetch for asset {} via {} failed, serving stored records: {}",
                        asset.id, assignment.provider_code, e
                    );
                }
            }
        }

        let mut by_day: BTreeMap<Day, PriceRecord> = self
            .price_store
            .range(&asset.id, start, end)?
            .into_iter()
            .map(|record| (record.day, record))
            .collect();

        // Seed the carry from just before the range, bounded by the
        // lookback window.
        let mut last_known = match start.date().pred_opt().map(Day::new) {
            Some(prev) => self
                .price_store
                .latest_on_or_before(&asset.id, prev)?
                .filter(|record| start.days_since(record.day) <= LOOKBACK_DAYS),
            None => None,
        };

        let mut results = Vec::new();
        for date in days_between(start.date(), end.date()) {
            let day = Day::new(date);
            if let Some(record) = by_day.remove(&day) {
                results.push(ValuationResult::from_record(&record));
                last_known = Some(record);
            } else if let Some(known) = &last_known {
                results.push(ValuationResult::carried(day, known));
            }
        }
        Ok(results)
    }

    /// Force a re-fetch of the current value.
    ///
    /// Market providers overwrite the exact-date record; synthetic
    /// providers simply recompute. A failed refresh leaves previously
    /// persisted records untouched.
    pub async fn refresh(&self, asset: &Asset) -> Result<ValuationResult> {
        let assignment = self.resolve_assignment(asset).await?;
        let provider = self.registry.get(&assignment.provider_code)?;

        let point = self
            .with_deadline(
                &assignment.provider_code,
                provider.current_value(&assignment.params),
            )
            .await?;

        if !provider.capabilities().synthetic {
            let record = PriceRecord::exact(asset.id.clone(), &point);
            self.price_store
                .save_records(std::slice::from_ref(&record), true)
                .await?;
        }

        Ok(ValuationResult::exact(asset.id.clone(), point))
    }

    /// Refresh many assets with bounded concurrency.
    ///
    /// Never fails as a whole: each asset's outcome is collected into the
    /// summary with provider and error attribution.
    pub async fn refresh_many(&self, assets: &[Asset]) -> RefreshSummary {
        let outcomes: Vec<(AssetId, Option<ProviderCode>, Result<ValuationResult>)> =
            stream::iter(assets.iter().map(|asset| async move {
                let result = self.refresh(asset).await;
                let provider = self
                    .assignment_store
                    .get(&asset.id)
                    .ok()
                    .flatten()
                    .map(|a| a.provider_code);
                (asset.id.clone(), provider, result)
            }))
            .buffer_unordered(MAX_CONCURRENT_REFRESHES)
            .collect()
            .await;

        let mut summary = RefreshSummary::default();
        for (asset_id, provider, result) in outcomes {
            match result {
                Ok(_) => summary.refreshed += 1,
                Err(e) => {
                    warn!("Refresh failed for asset {}: {}", asset_id, e);
                    summary.failed += 1;
                    summary.errors.push(RefreshError {
                        asset_id,
                        provider,
                        message: e.to_string(),
                    });
                }
            }
        }
        info!("{}", summary.summary());
        summary
    }

    /// The assignment that values this asset.
    ///
    /// Scheduled-yield assets without one are auto-assigned to the
    /// synthetic provider using their own terms; market-priced assets
    /// must be assigned explicitly first.
    async fn resolve_assignment(&self, asset: &Asset) -> Result<ProviderAssignment> {
        if let Some(existing) = self.assignment_store.get(&asset.id)? {
            return Ok(existing);
        }

        if asset.valuation_model == ValuationModel::ScheduledYield {
            let terms = asset
                .terms
                .as_ref()
                .ok_or_else(|| ValuationError::InvalidParams {
                    provider: ProviderCode::SCHEDULED_YIELD.to_string(),
                    message: format!("asset {} has no contractual terms", asset.id),
                })?;
            let params = ScheduledYieldProvider::params_from_terms(terms, &asset.currency)?;
            let assignment = ProviderAssignment::new(
                asset.id.clone(),
                ProviderCode::scheduled_yield(),
                params,
            );
            self.assignment_store.save(&assignment).await?;
            info!("Auto-assigned scheduled-yield provider to asset {}", asset.id);
            return Ok(assignment);
        }

        Err(ValuationError::AssignmentNotFound {
            asset_id: asset.id.to_string(),
        })
    }

    /// Run a provider call under the service deadline.
    ///
    /// A timeout surfaces as `ValuationError::Timeout` before anything is
    /// persisted, so stored records are never corrupted by a slow call.
    async fn with_deadline<T>(
        &self,
        provider: &ProviderCode,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ValuationError::Timeout {
                provider: provider.to_string(),
            }),
        }
    }
}
