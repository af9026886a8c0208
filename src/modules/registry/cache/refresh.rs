// Freshness-gated, coalesced refresh of cached datasets.
//
// Purpose
// - Decide whether a dataset must be read again from the remote workbook, and make sure at most
//   one read per dataset is in flight.
//
// State machine (per dataset)
// - Idle -> Refreshing -> Idle | IdleWithError.
//
// Rules
// - Non-forced and `now - last_refresh < window`: answer from the cache, no remote call.
// - Forced: clear the freshness key first, then always fetch.
// - A non-forced caller that waited behind an in-flight refresh receives that refresh's outcome.
// - Success replaces the cached rows and sets the freshness key. Failure keeps the cached rows and
//   leaves the freshness key unset.
// - The remote read runs on its own task and holds the flight until it settles, so a caller that
//   gives up early does not cancel it.

use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::store::CacheStore;
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::workbook::{RemoteWorkbook, WorkbookError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

pub const DEFAULT_FRESHNESS_WINDOW_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
    IdleWithError,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("refreshing {dataset} failed: {source}")]
    Remote {
        dataset: Dataset,
        #[source]
        source: WorkbookError,
    },

    #[error("refreshing {dataset} did not complete")]
    Interrupted { dataset: Dataset },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshSource {
    /// Fresh cache, no remote call.
    Cache,
    /// This call read the remote workbook.
    Remote,
    /// Another caller's in-flight read answered this call.
    Coalesced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refreshed {
    pub dataset: Dataset,
    pub source: RefreshSource,
    pub rows: Value,
}

#[derive(Default)]
struct DatasetSlot {
    flight: Arc<Mutex<()>>,
    completed: AtomicU64,
    state: RwLock<RefreshState>,
    last_outcome: RwLock<Option<Result<Value, RefreshError>>>,
}

pub struct RefreshCoordinator<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    workbook: Arc<TWorkbook>,
    cache: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    freshness_window_ms: i64,
    slots: HashMap<Dataset, Arc<DatasetSlot>>,
}

impl<TWorkbook> RefreshCoordinator<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(
        workbook: Arc<TWorkbook>,
        cache: Arc<CacheStore>,
        clock: Arc<dyn Clock>,
        freshness_window_ms: i64,
    ) -> Self {
        Self {
            workbook,
            cache,
            clock,
            freshness_window_ms,
            slots: Dataset::ALL
                .into_iter()
                .map(|dataset| (dataset, Arc::new(DatasetSlot::default())))
                .collect(),
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub fn workbook(&self) -> &Arc<TWorkbook> {
        &self.workbook
    }

    pub async fn refresh(&self, dataset: Dataset, force: bool) -> Result<Refreshed, RefreshError> {
        let slot = self.slot(dataset);

        if force {
            self.invalidate(dataset);
        } else if let Some(rows) = self.fresh_rows(dataset) {
            return Ok(Refreshed {
                dataset,
                source: RefreshSource::Cache,
                rows,
            });
        }

        let seen = slot.completed.load(Ordering::SeqCst);
        let flight = slot.flight.clone().lock_owned().await;

        if !force && slot.completed.load(Ordering::SeqCst) != seen {
            if let Some(outcome) = slot.last_outcome.read().await.clone() {
                tracing::debug!(%dataset, "joined in-flight refresh");
                return outcome.map(|rows| Refreshed {
                    dataset,
                    source: RefreshSource::Coalesced,
                    rows,
                });
            }
        }
        if !force {
            if let Some(rows) = self.fresh_rows(dataset) {
                return Ok(Refreshed {
                    dataset,
                    source: RefreshSource::Cache,
                    rows,
                });
            }
        }

        let task = tokio::spawn(settle(
            dataset,
            slot.clone(),
            self.workbook.clone(),
            self.cache.clone(),
            self.clock.clone(),
            flight,
        ));
        let outcome = task.await.unwrap_or_else(|e| {
            tracing::error!(%dataset, error = %e, "refresh task failed");
            Err(RefreshError::Interrupted { dataset })
        });

        outcome.map(|rows| Refreshed {
            dataset,
            source: RefreshSource::Remote,
            rows,
        })
    }

    /// Clears the freshness key so the next refresh reads the remote workbook.
    pub fn invalidate(&self, dataset: Dataset) {
        self.cache.remove(&dataset.freshness_key());
    }

    pub async fn state(&self, dataset: Dataset) -> RefreshState {
        *self.slot(dataset).state.read().await
    }

    pub fn cached_rows(&self, dataset: Dataset) -> Option<Value> {
        self.cache.get(&dataset.cache_key(), None)
    }

    pub fn last_refresh(&self, dataset: Dataset) -> Option<i64> {
        self.cache.get(&dataset.freshness_key(), None)
    }

    fn slot(&self, dataset: Dataset) -> &Arc<DatasetSlot> {
        // Every dataset gets a slot in `new`.
        &self.slots[&dataset]
    }

    fn fresh_rows(&self, dataset: Dataset) -> Option<Value> {
        let last = self.last_refresh(dataset)?;
        if self.clock.now_millis() - last >= self.freshness_window_ms {
            return None;
        }
        self.cached_rows(dataset)
    }
}

/// Reads the remote range, records the outcome on the slot and releases the flight.
async fn settle<TWorkbook>(
    dataset: Dataset,
    slot: Arc<DatasetSlot>,
    workbook: Arc<TWorkbook>,
    cache: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    flight: OwnedMutexGuard<()>,
) -> Result<Value, RefreshError>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    *slot.state.write().await = RefreshState::Refreshing;
    let outcome = fetch(dataset, workbook.as_ref(), &cache, clock.as_ref()).await;
    *slot.state.write().await = match outcome {
        Ok(_) => RefreshState::Idle,
        Err(_) => RefreshState::IdleWithError,
    };
    *slot.last_outcome.write().await = Some(outcome.clone());
    slot.completed.fetch_add(1, Ordering::SeqCst);
    drop(flight);
    outcome
}

async fn fetch<TWorkbook>(
    dataset: Dataset,
    workbook: &TWorkbook,
    cache: &CacheStore,
    clock: &dyn Clock,
) -> Result<Value, RefreshError>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    tracing::info!(%dataset, sheet = dataset.sheet(), "refreshing from remote workbook");
    let rows = workbook.fetch_range(dataset.sheet()).await.map_err(|source| {
        tracing::warn!(%dataset, error = %source, "remote refresh failed, keeping cached rows");
        RefreshError::Remote { dataset, source }
    })?;

    if cache.set(&dataset.cache_key(), &rows) {
        cache.set(&dataset.freshness_key(), &clock.now_millis());
    }
    Ok(rows)
}
