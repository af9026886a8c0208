use crate::modules::registry::core::stages::{QuantityError, StageAvailability};
use crate::modules::registry::core::status::BatchStatus;
use crate::shared::infrastructure::workbook::RowValues;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("batch {batch} of work order {wo_no} ({client}) does not exist")]
    BatchNotFound {
        client: String,
        wo_no: String,
        batch: String,
    },

    #[error("batch {batch} has no pipes to inspect")]
    EmptyBatch { batch: String },

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

pub enum Decision {
    Accepted {
        patch: RowValues,
        status: BatchStatus,
        cascade: Vec<StageAvailability>,
    },
    Rejected {
        reason: DecideError,
    },
}
