use crate::modules::registry::core::allocation::BatchAllocation;

/// A Tubing Registry form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBatch {
    pub client: String,
    pub wo_no: String,
    /// Allocation the form displayed when the user filled it in.
    pub shown: BatchAllocation,
    pub diameter: String,
    pub rack: String,
    pub arrival_date: String,
    /// Form instance that displayed `shown`, echoed back for correlation.
    pub session_id: Option<String>,
}
