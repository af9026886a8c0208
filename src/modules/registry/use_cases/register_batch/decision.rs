use crate::modules::registry::core::allocation::{AllocationError, BatchAllocation};
use crate::modules::registry::core::records::BatchRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("work order {wo_no} of {client} does not exist")]
    UnknownWorkOrder { client: String, wo_no: String },

    #[error("work order {wo_no} of {client} is closed")]
    WorkOrderClosed { client: String, wo_no: String },
}

pub enum Decision {
    Accepted {
        allocation: BatchAllocation,
        record: BatchRecord,
    },
    Rejected {
        reason: DecideError,
    },
}
