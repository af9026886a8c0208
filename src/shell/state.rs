use crate::modules::registry::cache::refresh::RefreshCoordinator;
use crate::modules::registry::cache::store::CacheStore;
use crate::modules::registry::use_cases::browse_datasets::handler::BrowseDatasetsHandler;
use crate::modules::registry::use_cases::edit_work_order::handler::EditWorkOrderHandler;
use crate::modules::registry::use_cases::manage_clients::handler::ManageClientsHandler;
use crate::modules::registry::use_cases::record_inspection::handler::RecordInspectionHandler;
use crate::modules::registry::use_cases::register_batch::handler::RegisterBatchHandler;
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::storage::KeyValueStorage;
use crate::shared::infrastructure::workbook::in_memory::InMemoryWorkbook;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RefreshCoordinator<InMemoryWorkbook>>,
    pub register_batch: Arc<RegisterBatchHandler<InMemoryWorkbook>>,
    pub record_inspection: Arc<RecordInspectionHandler<InMemoryWorkbook>>,
    pub edit_work_order: Arc<EditWorkOrderHandler<InMemoryWorkbook>>,
    pub manage_clients: Arc<ManageClientsHandler<InMemoryWorkbook>>,
    pub browse_datasets: Arc<BrowseDatasetsHandler<InMemoryWorkbook>>,
}

impl AppState {
    /// Wires every handler onto one shared coordinator, so all forms see the same cache.
    pub fn wire(
        workbook: Arc<InMemoryWorkbook>,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        freshness_window_ms: i64,
    ) -> Self {
        let cache = Arc::new(CacheStore::new(storage, clock.clone()));
        let coordinator = Arc::new(RefreshCoordinator::new(
            workbook,
            cache,
            clock,
            freshness_window_ms,
        ));

        Self {
            register_batch: Arc::new(RegisterBatchHandler::new(coordinator.clone())),
            record_inspection: Arc::new(RecordInspectionHandler::new(coordinator.clone())),
            edit_work_order: Arc::new(EditWorkOrderHandler::new(coordinator.clone())),
            manage_clients: Arc::new(ManageClientsHandler::new(coordinator.clone())),
            browse_datasets: Arc::new(BrowseDatasetsHandler::new(coordinator.clone())),
            coordinator,
        }
    }
}
