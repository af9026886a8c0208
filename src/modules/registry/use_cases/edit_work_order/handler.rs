use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::RefreshCoordinator;
use crate::modules::registry::core::records::WorkOrder;
use crate::modules::registry::core::table::{parse_batch_records, parse_work_orders};
use crate::modules::registry::use_cases::edit_work_order::{
    command::EditWorkOrder, decide::decide_edit_work_order, decision::Decision,
};
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::workbook::RemoteWorkbook;
use std::sync::Arc;

pub struct EditWorkOrderHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    coordinator: Arc<RefreshCoordinator<TWorkbook>>,
}

impl<TWorkbook> EditWorkOrderHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(coordinator: Arc<RefreshCoordinator<TWorkbook>>) -> Self {
        Self { coordinator }
    }

    pub async fn handle(&self, command: EditWorkOrder) -> Result<WorkOrder, ApplicationError> {
        // Both guards depend on the batch count, so neither read may come from a stale mirror.
        let work_orders = self.coordinator.refresh(Dataset::WorkOrders, true).await?;
        let tubing = self.coordinator.refresh(Dataset::Tubing, true).await?;
        let work_orders = parse_work_orders(&work_orders.rows).records;
        let batch_count = parse_batch_records(&tubing.rows)
            .records
            .iter()
            .filter(|record| record.belongs_to(&command.client, &command.wo_no))
            .count();
        let current = work_orders
            .iter()
            .find(|wo| wo.is(&command.client, &command.wo_no));

        match decide_edit_work_order(current, batch_count, command) {
            Decision::Accepted { patch, updated } => {
                self.coordinator
                    .workbook()
                    .update_row(Dataset::WorkOrders.sheet(), &updated.key_matcher(), patch)
                    .await?;
                self.coordinator.invalidate(Dataset::WorkOrders);
                tracing::info!(client = %updated.client, wo_no = %updated.wo_no, "work order updated");
                Ok(updated)
            }
            Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
        }
    }
}
