use crate::modules::registry::cache::refresh::RefreshError;
use crate::modules::registry::core::allocation::AllocationError;
use crate::shared::infrastructure::workbook::WorkbookError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("domain rejected: {0}")]
    Domain(String),

    #[error("unexpected: {0}")]
    Unexpected(String),
}
