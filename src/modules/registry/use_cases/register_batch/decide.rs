use crate::modules::registry::core::allocation::revalidate_allocation;
use crate::modules::registry::core::normalize::normalize_date_str;
use crate::modules::registry::core::records::{BatchRecord, WorkOrder, WorkOrderStatus};
use crate::modules::registry::core::status::BatchStatus;
use crate::modules::registry::use_cases::register_batch::{
    command::RegisterBatch,
    decision::{DecideError, Decision},
};

pub fn decide_register_batch(
    records: &[BatchRecord],
    work_orders: &[WorkOrder],
    command: RegisterBatch,
) -> Decision {
    let Some(work_order) = work_orders
        .iter()
        .find(|wo| wo.is(&command.client, &command.wo_no))
    else {
        return Decision::Rejected {
            reason: DecideError::UnknownWorkOrder {
                client: command.client,
                wo_no: command.wo_no,
            },
        };
    };
    if work_order.status == WorkOrderStatus::Closed {
        return Decision::Rejected {
            reason: DecideError::WorkOrderClosed {
                client: command.client,
                wo_no: command.wo_no,
            },
        };
    }

    let allocation =
        match revalidate_allocation(&command.shown, records, &command.client, &command.wo_no) {
            Ok(allocation) => allocation,
            Err(e) => return Decision::Rejected { reason: e.into() },
        };

    let diameter = if command.diameter.trim().is_empty() {
        work_order.diameter.clone()
    } else {
        command.diameter.trim().to_string()
    };
    let record = BatchRecord {
        client: work_order.client.clone(),
        wo_no: work_order.wo_no.clone(),
        batch: allocation.batch.clone(),
        diameter,
        qty: allocation.qty.to_string(),
        pipe_from: allocation.pipe_from.to_string(),
        pipe_to: allocation.pipe_to.to_string(),
        rack: command.rack.trim().to_string(),
        arrival_date: normalize_date_str(&command.arrival_date),
        status: BatchStatus::Received.label().to_string(),
        ..BatchRecord::default()
    };

    Decision::Accepted { allocation, record }
}
