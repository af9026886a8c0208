use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::RefreshCoordinator;
use crate::modules::registry::core::records::{ClientRecord, columns};
use crate::modules::registry::core::table::parse_client_records;
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::modules::registry::use_cases::manage_clients::{
    command::{AddClient, RenameClient},
    decide::{decide_add_client, decide_rename_client},
    decision::{DecideError, Decision},
};
use crate::shared::infrastructure::workbook::{RemoteWorkbook, RowMatcher, RowValues};
use serde_json::Value;
use std::sync::Arc;

/// Client directory maintenance. Full records live on the Client Records sheet; the Clients sheet
/// only lists names for the form drop-downs and is kept in step.
///
/// Client Records is written first. When the Clients write fails the record already exists, so
/// retrying the same add or rename completes the listing instead of being rejected.
pub struct ManageClientsHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    coordinator: Arc<RefreshCoordinator<TWorkbook>>,
}

impl<TWorkbook> ManageClientsHandler<TWorkbook>
where
    TWorkbook: RemoteWorkbook + 'static,
{
    pub fn new(coordinator: Arc<RefreshCoordinator<TWorkbook>>) -> Self {
        Self { coordinator }
    }

    pub async fn add(&self, command: AddClient) -> Result<ClientRecord, ApplicationError> {
        let existing = self.current_clients().await?;
        let requested = command.name.clone();
        match decide_add_client(&existing, command) {
            Decision::Added { record } => {
                let written = self.write_added(&record).await;
                self.invalidate();
                written?;
                tracing::info!(name = %record.name, code = %record.client_code, "client added");
                Ok(record)
            }
            Decision::Rejected {
                reason: reason @ DecideError::DuplicateName { .. },
            } => self.complete_listing(&existing, &requested, None, reason).await,
            Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
            Decision::Renamed { .. } => Err(ApplicationError::Unexpected(
                "add produced a rename".into(),
            )),
        }
    }

    pub async fn rename(&self, command: RenameClient) -> Result<ClientRecord, ApplicationError> {
        let existing = self.current_clients().await?;
        let (current_name, new_name) = (command.current_name.clone(), command.new_name.clone());
        match decide_rename_client(&existing, command) {
            Decision::Renamed { previous, record } => {
                let written = self.write_renamed(&previous, &record).await;
                self.invalidate();
                written?;
                tracing::info!(from = %previous.name, to = %record.name, "client renamed");
                Ok(record)
            }
            Decision::Rejected {
                reason: reason @ DecideError::ClientNotFound { .. },
            } => {
                self.complete_listing(&existing, &new_name, Some(&current_name), reason)
                    .await
            }
            Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
            Decision::Added { .. } => Err(ApplicationError::Unexpected(
                "rename produced an addition".into(),
            )),
        }
    }

    async fn write_added(&self, record: &ClientRecord) -> Result<(), ApplicationError> {
        self.coordinator
            .workbook()
            .append_row(Dataset::ClientRecords.sheet(), record.to_row())
            .await?;
        self.sync_listing(None, &record.name).await?;
        Ok(())
    }

    async fn write_renamed(
        &self,
        previous: &ClientRecord,
        record: &ClientRecord,
    ) -> Result<(), ApplicationError> {
        let by_code = RowMatcher::new().with(columns::CLIENT_CODE, previous.client_code.clone());
        self.coordinator
            .workbook()
            .update_row(Dataset::ClientRecords.sheet(), &by_code, name_row(&record.name))
            .await?;
        self.sync_listing(Some(&previous.name), &record.name).await?;
        Ok(())
    }

    /// A rejected add or rename whose target record already exists but is missing from the
    /// Clients sheet is the retry of an interrupted write. The listing is completed and the stored
    /// record returned. Any other rejection stands.
    async fn complete_listing(
        &self,
        existing: &[ClientRecord],
        name: &str,
        previous: Option<&str>,
        reason: DecideError,
    ) -> Result<ClientRecord, ApplicationError> {
        let Some(record) = existing.iter().find(|client| client.has_name(name)) else {
            return Err(ApplicationError::Domain(reason.to_string()));
        };
        let synced = self.sync_listing(previous, &record.name).await;
        self.invalidate();
        if !synced? {
            return Err(ApplicationError::Domain(reason.to_string()));
        }
        tracing::info!(name = %record.name, "client listing completed");
        Ok(record.clone())
    }

    /// Makes the Clients sheet list `name` exactly once. Renames the `previous` entry when there
    /// is one, otherwise appends. Returns whether anything was written.
    async fn sync_listing(&self, previous: Option<&str>, name: &str) -> Result<bool, ApplicationError> {
        let refreshed = self.coordinator.refresh(Dataset::Clients, true).await?;
        let listed = parse_client_records(&refreshed.rows).records;
        if listed.iter().any(|client| client.name.trim() == name.trim()) {
            return Ok(false);
        }

        let workbook = self.coordinator.workbook();
        match previous.filter(|previous| listed.iter().any(|client| client.has_name(previous))) {
            Some(previous) => {
                let by_name = RowMatcher::new().with(columns::CLIENT_NAME, previous);
                workbook
                    .update_row(Dataset::Clients.sheet(), &by_name, name_row(name))
                    .await?
            }
            None => {
                workbook
                    .append_row(Dataset::Clients.sheet(), name_row(name))
                    .await?
            }
        }
        Ok(true)
    }

    async fn current_clients(&self) -> Result<Vec<ClientRecord>, ApplicationError> {
        let refreshed = self.coordinator.refresh(Dataset::ClientRecords, true).await?;
        Ok(parse_client_records(&refreshed.rows).records)
    }

    fn invalidate(&self) {
        self.coordinator.invalidate(Dataset::ClientRecords);
        self.coordinator.invalidate(Dataset::Clients);
    }
}

fn name_row(name: &str) -> RowValues {
    let mut row = RowValues::new();
    row.insert(columns::CLIENT_NAME.into(), Value::String(name.to_string()));
    row
}
