// AppState seeded with one open work order, two registered batches and one client.

use crate::modules::registry::cache::dataset::Dataset;
use crate::shared::core::clock::FixedClock;
use crate::shared::infrastructure::storage::in_memory::InMemoryStorage;
use crate::shared::infrastructure::workbook::in_memory::InMemoryWorkbook;
use crate::shell::state::AppState;
use crate::tests::fixtures::records::{
    BatchRecordBuilder, client_name_sheet, client_sheet, make_client, make_work_order,
    tubing_sheet, work_order_sheet,
};
use std::sync::Arc;

pub async fn make_seeded_workbook() -> Arc<InMemoryWorkbook> {
    let workbook = Arc::new(InMemoryWorkbook::new());
    workbook
        .seed(
            Dataset::Tubing.sheet(),
            tubing_sheet(&[
                BatchRecordBuilder::new()
                    .batch("Batch # 1")
                    .qty("120")
                    .pipe_range("1", "120")
                    .build(),
                BatchRecordBuilder::new()
                    .batch("Batch # 2")
                    .qty("120")
                    .pipe_range("121", "240")
                    .build(),
            ]),
        )
        .await;
    workbook
        .seed(Dataset::WorkOrders.sheet(), work_order_sheet(&[make_work_order()]))
        .await;
    workbook
        .seed(
            Dataset::ClientRecords.sheet(),
            client_sheet(&[make_client("Acme", "C-001")]),
        )
        .await;
    workbook
        .seed(Dataset::Clients.sheet(), client_name_sheet(&["Acme"]))
        .await;
    workbook
}

pub async fn make_test_state() -> AppState {
    AppState::wire(
        make_seeded_workbook().await,
        Arc::new(InMemoryStorage::new()),
        Arc::new(FixedClock::new(1_700_000_000_000)),
        60_000,
    )
}

pub async fn make_offline_state() -> AppState {
    let workbook = make_seeded_workbook().await;
    workbook.toggle_offline();
    AppState::wire(
        workbook,
        Arc::new(InMemoryStorage::new()),
        Arc::new(FixedClock::new(1_700_000_000_000)),
        60_000,
    )
}
