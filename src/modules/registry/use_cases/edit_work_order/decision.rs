use crate::modules::registry::core::records::WorkOrder;
use crate::shared::infrastructure::workbook::RowValues;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("work order {wo_no} of {client} does not exist")]
    WorkOrderNotFound { client: String, wo_no: String },

    #[error("{field} cannot change once the work order has batches ({batches} registered)")]
    ImmutableField { field: &'static str, batches: usize },

    #[error("{value:?} is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("a work order without batches cannot be closed")]
    CloseWithoutBatches,

    #[error("nothing to change")]
    NothingToChange,
}

pub enum Decision {
    Accepted {
        patch: RowValues,
        updated: WorkOrder,
    },
    Rejected {
        reason: DecideError,
    },
}
