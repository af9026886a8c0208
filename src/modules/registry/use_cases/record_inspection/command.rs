use crate::modules::registry::core::stages::{Classification, StageScraps};

/// An Inspection Edit form save for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInspection {
    pub client: String,
    pub wo_no: String,
    pub batch: String,
    pub start_date: String,
    pub end_date: String,
    pub scraps: StageScraps,
    pub classification: Classification,
}
