// Batch lifecycle status.
//
// Purpose
// - Parse the free-text status cell once, so downstream logic matches on a closed enumeration.
//
// Parsing
// - Case-insensitive substring checks, most advanced state first: "AVR DONE" must win over
//   "AWAITING AVR", and both over the inspection states.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    Received,
    InspectionDone,
    AwaitingAvr,
    AvrDone,
    Completed,
    Unrecognized,
}

impl BatchStatus {
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper.is_empty() {
            return BatchStatus::Unrecognized;
        }
        if upper.contains("COMPLETED") {
            BatchStatus::Completed
        } else if upper.contains("AVR DONE") {
            BatchStatus::AvrDone
        } else if upper.contains("AWAITING AVR") {
            BatchStatus::AwaitingAvr
        } else if upper.contains("INSPECTION DONE") {
            BatchStatus::InspectionDone
        } else if upper.contains("RECEIVED") || upper.contains("AWAITING INSPECTION") {
            BatchStatus::Received
        } else {
            BatchStatus::Unrecognized
        }
    }

    /// Text written back to the status cell.
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Received => "RECEIVED - AWAITING INSPECTION",
            BatchStatus::InspectionDone => "INSPECTION DONE",
            BatchStatus::AwaitingAvr => "AWAITING AVR",
            BatchStatus::AvrDone => "AVR DONE",
            BatchStatus::Completed => "Completed",
            BatchStatus::Unrecognized => "",
        }
    }

    pub fn is_inspected(&self) -> bool {
        matches!(
            self,
            BatchStatus::InspectionDone
                | BatchStatus::AwaitingAvr
                | BatchStatus::AvrDone
                | BatchStatus::Completed
        )
    }
}
