use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::RefreshCoordinator;
use crate::modules::registry::core::allocation::{BatchAllocation, allocate_next_batch};
use crate::modules::registry::core::table::{parse_batch_records, parse_work_orders};
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::modules::registry::use_cases::register_batch::{
    command::RegisterBatch,
    decide::decide_register_batch,
    decision::{DecideError, Decision},
};
use crate::shared::infrastructure::workbook::RemoteWorkbook;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct RegisterBatchHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    coordinator: Arc<RefreshCoordinator<TWorkbook>>,
    /// Held from the forced registry read until the new row is appended, so two submissions of
    /// the same allocation cannot both pass the staleness check.
    registration: Mutex<()>,
}

impl<TWorkbook> RegisterBatchHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(coordinator: Arc<RefreshCoordinator<TWorkbook>>) -> Self {
        Self {
            coordinator,
            registration: Mutex::new(()),
        }
    }

    /// Next allocation for the form, computed from the cached registry.
    pub async fn preview(
        &self,
        client: &str,
        wo_no: &str,
        qty: u32,
    ) -> Result<BatchAllocation, ApplicationError> {
        let tubing = self.coordinator.refresh(Dataset::Tubing, false).await?;
        let records = parse_batch_records(&tubing.rows).records;
        Ok(allocate_next_batch(&records, client, wo_no, qty)?)
    }

    pub async fn handle(&self, command: RegisterBatch) -> Result<BatchAllocation, ApplicationError> {
        let _registration = self.registration.lock().await;
        let tubing = self.coordinator.refresh(Dataset::Tubing, true).await?;
        let work_orders = self.coordinator.refresh(Dataset::WorkOrders, false).await?;
        let records = parse_batch_records(&tubing.rows).records;
        let work_orders = parse_work_orders(&work_orders.rows).records;
        let session_id = command.session_id.clone();

        match decide_register_batch(&records, &work_orders, command) {
            Decision::Accepted { allocation, record } => {
                self.coordinator
                    .workbook()
                    .append_row(Dataset::Tubing.sheet(), record.to_registration_row())
                    .await?;
                self.coordinator.invalidate(Dataset::Tubing);
                tracing::info!(
                    client = %record.client,
                    wo_no = %record.wo_no,
                    batch = %allocation,
                    session_id = session_id.as_deref().unwrap_or("-"),
                    "batch registered"
                );
                Ok(allocation)
            }
            Decision::Rejected {
                reason: DecideError::Allocation(e),
            } => {
                tracing::warn!(
                    error = %e,
                    session_id = session_id.as_deref().unwrap_or("-"),
                    "batch registration rejected"
                );
                Err(ApplicationError::Allocation(e))
            }
            Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
        }
    }
}
