use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::RefreshCoordinator;
use crate::modules::registry::core::stages::StageAvailability;
use crate::modules::registry::core::status::BatchStatus;
use crate::modules::registry::core::table::parse_batch_records;
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::modules::registry::use_cases::record_inspection::{
    command::RecordInspection, decide::decide_record_inspection, decision::Decision,
};
use crate::shared::infrastructure::workbook::RemoteWorkbook;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionRecorded {
    pub status: BatchStatus,
    pub cascade: Vec<StageAvailability>,
}

pub struct RecordInspectionHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    coordinator: Arc<RefreshCoordinator<TWorkbook>>,
}

impl<TWorkbook> RecordInspectionHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(coordinator: Arc<RefreshCoordinator<TWorkbook>>) -> Self {
        Self { coordinator }
    }

    pub async fn handle(
        &self,
        command: RecordInspection,
    ) -> Result<InspectionRecorded, ApplicationError> {
        let tubing = self.coordinator.refresh(Dataset::Tubing, true).await?;
        let records = parse_batch_records(&tubing.rows).records;
        let batch = records.iter().find(|record| {
            record.belongs_to(&command.client, &command.wo_no)
                && record.batch.trim().eq_ignore_ascii_case(command.batch.trim())
        });

        match decide_record_inspection(batch, command) {
            Decision::Accepted {
                patch,
                status,
                cascade,
            } => {
                // Accepted implies the batch was found.
                let matcher = batch
                    .map(|record| record.key_matcher())
                    .ok_or_else(|| ApplicationError::Unexpected("accepted without a batch".into()))?;
                self.coordinator
                    .workbook()
                    .update_row(Dataset::Tubing.sheet(), &matcher, patch)
                    .await?;
                self.coordinator.invalidate(Dataset::Tubing);
                tracing::info!(%matcher, status = status.label(), "inspection recorded");
                Ok(InspectionRecorded { status, cascade })
            }
            Decision::Rejected { reason } => {
                tracing::warn!(error = %reason, "inspection rejected");
                Err(ApplicationError::Domain(reason.to_string()))
            }
        }
    }
}
