use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::{
    RefreshCoordinator, RefreshSource, RefreshState,
};
use crate::modules::registry::core::table::{
    ParseWarning, parse_batch_records, parse_client_records, parse_work_orders,
};
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::workbook::RemoteWorkbook;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetView {
    pub dataset: Dataset,
    pub source: RefreshSource,
    pub state: RefreshState,
    pub last_refresh: Option<i64>,
    /// Set when the remote read failed and the cached rows are shown instead.
    pub refresh_error: Option<String>,
    pub records: Value,
    pub warnings: Vec<ParseWarning>,
}

pub struct BrowseDatasetsHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    coordinator: Arc<RefreshCoordinator<TWorkbook>>,
}

impl<TWorkbook> BrowseDatasetsHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(coordinator: Arc<RefreshCoordinator<TWorkbook>>) -> Self {
        Self { coordinator }
    }

    pub async fn handle(&self, dataset: Dataset, force: bool) -> Result<DatasetView, ApplicationError> {
        let (source, rows, refresh_error) = match self.coordinator.refresh(dataset, force).await {
            Ok(refreshed) => (refreshed.source, refreshed.rows, None),
            Err(e) => match self.coordinator.cached_rows(dataset) {
                Some(rows) => (RefreshSource::Cache, rows, Some(e.to_string())),
                None => return Err(e.into()),
            },
        };
        let (records, warnings) = typed_records(dataset, &rows)?;
        for warning in &warnings {
            tracing::debug!(%dataset, row = warning.row, reason = ?warning.reason, "row skipped");
        }

        Ok(DatasetView {
            dataset,
            source,
            state: self.coordinator.state(dataset).await,
            last_refresh: self.coordinator.last_refresh(dataset),
            refresh_error,
            records,
            warnings,
        })
    }
}

fn typed_records(
    dataset: Dataset,
    rows: &Value,
) -> Result<(Value, Vec<ParseWarning>), ApplicationError> {
    let encoded = match dataset {
        Dataset::Clients => {
            let parsed = parse_client_records(rows);
            let names: Vec<String> = parsed.records.into_iter().map(|c| c.name).collect();
            serde_json::to_value(names).map(|v| (v, parsed.warnings))
        }
        Dataset::ClientRecords => {
            let parsed = parse_client_records(rows);
            serde_json::to_value(parsed.records).map(|v| (v, parsed.warnings))
        }
        Dataset::WorkOrders => {
            let parsed = parse_work_orders(rows);
            serde_json::to_value(parsed.records).map(|v| (v, parsed.warnings))
        }
        Dataset::Tubing => {
            let parsed = parse_batch_records(rows);
            serde_json::to_value(parsed.records).map(|v| (v, parsed.warnings))
        }
    };
    encoded.map_err(|e| ApplicationError::Unexpected(e.to_string()))
}
