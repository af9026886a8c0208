// End to end in memory test for a batch from registration to a closed work order.
//
// Flow
// - Register the next batch through the shared AppState.
// - Record its inspection against a fresh read of the registry.
// - Close the work order and browse the datasets the forms read.

use crate::modules::registry::cache::dataset::Dataset;
use crate::modules::registry::cache::refresh::RefreshSource;
use crate::modules::registry::core::records::WorkOrderStatus;
use crate::modules::registry::core::stages::Stage;
use crate::modules::registry::core::status::BatchStatus;
use crate::modules::registry::use_cases::edit_work_order::command::{
    EditWorkOrder, WorkOrderChanges,
};
use crate::tests::fixtures::commands::{RecordInspectionBuilder, RegisterBatchBuilder};
use crate::tests::fixtures::state::make_test_state;

#[tokio::test]
async fn registers_inspects_and_closes_a_batch() {
    let state = make_test_state().await;

    let shown = state.register_batch.preview("Acme", "100", 30).await.unwrap();
    assert_eq!(shown.batch, "Batch # 3");
    assert_eq!((shown.pipe_from, shown.pipe_to), (241, 270));

    let registered = state
        .register_batch
        .handle(
            RegisterBatchBuilder::new()
                .shown(&shown.batch, shown.pipe_from, shown.qty)
                .rack("R9")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(registered, shown);

    let next = state.register_batch.preview("Acme", "100", 10).await.unwrap();
    assert_eq!(next.batch, "Batch # 4");
    assert_eq!(next.pipe_from, 271);

    let recorded = state
        .record_inspection
        .handle(
            RecordInspectionBuilder::new()
                .batch("Batch # 3")
                .scrap(Stage::Hydro, 2)
                .classes(25, 2, 0, 1)
                .dates("2024-03-06", "2024-03-07")
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(recorded.status, BatchStatus::InspectionDone);
    assert_eq!(recorded.cascade[3].available, 28);

    let closed = state
        .edit_work_order
        .handle(EditWorkOrder {
            client: "Acme".into(),
            wo_no: "100".into(),
            changes: WorkOrderChanges {
                status: Some(WorkOrderStatus::Closed),
                ..WorkOrderChanges::default()
            },
        })
        .await
        .unwrap();
    assert_eq!(closed.status, WorkOrderStatus::Closed);

    // The work order edit just read the registry, so the form browse is served from the cache.
    let tubing = state.browse_datasets.handle(Dataset::Tubing, false).await.unwrap();
    assert_eq!(tubing.source, RefreshSource::Cache);
    let batch = &tubing.records[2];
    assert_eq!(batch["batch"], "Batch # 3");
    assert_eq!(batch["rack"], "R9");
    assert_eq!(batch["status"], "INSPECTION DONE");
    assert_eq!(batch["end_date"], "2024-03-07");

    let work_orders = state
        .browse_datasets
        .handle(Dataset::WorkOrders, false)
        .await
        .unwrap();
    assert_eq!(work_orders.source, RefreshSource::Remote);
    assert_eq!(work_orders.records[0]["status"], "Closed");
}
