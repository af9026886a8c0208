// Registry domain records.
//
// Purpose
// - Typed views of the tubing registry, work order and client sheets.
//
// Representation
// - Cells stay string-encoded, the way the workbook stores them. Numeric helpers parse on demand.
// - `columns` holds the header labels this crate writes with; the parser also accepts variants.

use crate::modules::registry::core::normalize::parse_quantity;
use crate::modules::registry::core::stages::{Classification, Stage, StageScraps};
use crate::modules::registry::core::status::BatchStatus;
use crate::shared::infrastructure::workbook::{RowMatcher, RowValues};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod columns {
    pub const CLIENT: &str = "Client";
    pub const WO_NO: &str = "WO No";
    pub const BATCH: &str = "Batch";
    pub const DIAMETER: &str = "Diameter";
    pub const QTY: &str = "Qty";
    pub const PIPE_FROM: &str = "Pipe From";
    pub const PIPE_TO: &str = "Pipe To";
    pub const RACK: &str = "Rack";
    pub const ARRIVAL_DATE: &str = "Arrival Date";
    pub const START_DATE: &str = "Start Date";
    pub const END_DATE: &str = "End Date";
    pub const CLASS_1: &str = "Class 1";
    pub const CLASS_2: &str = "Class 2";
    pub const CLASS_3: &str = "Class 3";
    pub const REPAIR: &str = "Repair";
    pub const STATUS: &str = "Status";
    pub const LOAD_OUT_DATE: &str = "Load Out Date";
    pub const ACT_NO_OPER: &str = "Act No Oper";
    pub const ACT_DATE: &str = "Act Date";

    pub const WO_TYPE: &str = "WO Type";
    pub const PIPE_TYPE: &str = "Pipe Type";
    pub const PLANNED_QTY: &str = "Planned Qty";
    pub const PRICE_TYPE: &str = "Price Type";
    pub const PRICE: &str = "Price";
    pub const TRANSPORT: &str = "Transport";
    pub const TRANSPORT_COST: &str = "Transport Cost";

    pub const CLIENT_NAME: &str = "Client Name";
    pub const PAYER: &str = "Payer";
    pub const CLIENT_CODE: &str = "Client Code";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub client: String,
    pub wo_no: String,
    pub batch: String,
    pub diameter: String,
    pub qty: String,
    pub pipe_from: String,
    pub pipe_to: String,
    pub rack: String,
    pub arrival_date: String,
    pub start_date: String,
    pub end_date: String,
    pub rattling: String,
    pub external: String,
    pub hydro: String,
    pub mpi: String,
    pub drift: String,
    pub emi: String,
    pub marking: String,
    pub rattling_scrap: String,
    pub external_scrap: String,
    pub hydro_scrap: String,
    pub mpi_scrap: String,
    pub drift_scrap: String,
    pub emi_scrap: String,
    pub marking_scrap: String,
    pub class_1: String,
    pub class_2: String,
    pub class_3: String,
    pub repair: String,
    pub status: String,
    pub load_out_date: String,
    pub act_no_oper: String,
    pub act_date: String,
}

impl BatchRecord {
    pub fn quantity(&self) -> u32 {
        parse_quantity(&self.qty)
    }

    pub fn pipe_to_value(&self) -> u32 {
        parse_quantity(&self.pipe_to)
    }

    pub fn batch_status(&self) -> BatchStatus {
        BatchStatus::parse(&self.status)
    }

    pub fn belongs_to(&self, client: &str, wo_no: &str) -> bool {
        self.client.trim().eq_ignore_ascii_case(client.trim())
            && self.wo_no.trim().eq_ignore_ascii_case(wo_no.trim())
    }

    pub fn stage_quantity(&self, stage: Stage) -> &str {
        match stage {
            Stage::Rattling => &self.rattling,
            Stage::External => &self.external,
            Stage::Hydro => &self.hydro,
            Stage::Mpi => &self.mpi,
            Stage::Drift => &self.drift,
            Stage::Emi => &self.emi,
            Stage::Marking => &self.marking,
        }
    }

    pub fn stage_scrap(&self, stage: Stage) -> &str {
        match stage {
            Stage::Rattling => &self.rattling_scrap,
            Stage::External => &self.external_scrap,
            Stage::Hydro => &self.hydro_scrap,
            Stage::Mpi => &self.mpi_scrap,
            Stage::Drift => &self.drift_scrap,
            Stage::Emi => &self.emi_scrap,
            Stage::Marking => &self.marking_scrap,
        }
    }

    pub fn stage_scraps(&self) -> StageScraps {
        Stage::ORDER
            .iter()
            .fold(StageScraps::new(), |scraps, stage| {
                scraps.with(*stage, parse_quantity(self.stage_scrap(*stage)))
            })
    }

    pub fn classification(&self) -> Classification {
        Classification {
            class_1: parse_quantity(&self.class_1),
            class_2: parse_quantity(&self.class_2),
            class_3: parse_quantity(&self.class_3),
            repair: parse_quantity(&self.repair),
        }
    }

    /// Matches this batch's row by its compound identity.
    pub fn key_matcher(&self) -> RowMatcher {
        RowMatcher::new()
            .with(columns::CLIENT, self.client.clone())
            .with(columns::WO_NO, self.wo_no.clone())
            .with(columns::BATCH, self.batch.clone())
    }

    /// Cells of a newly registered batch.
    pub fn to_registration_row(&self) -> RowValues {
        let mut row = RowValues::new();
        for (column, value) in [
            (columns::CLIENT, &self.client),
            (columns::WO_NO, &self.wo_no),
            (columns::BATCH, &self.batch),
            (columns::DIAMETER, &self.diameter),
            (columns::QTY, &self.qty),
            (columns::PIPE_FROM, &self.pipe_from),
            (columns::PIPE_TO, &self.pipe_to),
            (columns::RACK, &self.rack),
            (columns::ARRIVAL_DATE, &self.arrival_date),
            (columns::STATUS, &self.status),
        ] {
            row.insert(column.to_string(), Value::String(value.clone()));
        }
        row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    #[default]
    Open,
    Closed,
}

impl WorkOrderStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("closed") {
            WorkOrderStatus::Closed
        } else {
            WorkOrderStatus::Open
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderStatus::Open => "Open",
            WorkOrderStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub client: String,
    pub wo_no: String,
    /// "OCTG Inspection" or "Coupling Replace".
    pub wo_type: String,
    pub pipe_type: String,
    pub diameter: String,
    pub planned_qty: String,
    /// "Fixed" or "Stage Based".
    pub price_type: String,
    pub price: String,
    /// "Client" or "TCC".
    pub transport: String,
    pub transport_cost: String,
    pub status: WorkOrderStatus,
}

impl WorkOrder {
    pub fn key_matcher(&self) -> RowMatcher {
        RowMatcher::new()
            .with(columns::CLIENT, self.client.clone())
            .with(columns::WO_NO, self.wo_no.clone())
    }

    pub fn is(&self, client: &str, wo_no: &str) -> bool {
        self.client.trim().eq_ignore_ascii_case(client.trim())
            && self.wo_no.trim().eq_ignore_ascii_case(wo_no.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    pub payer: String,
    #[serde(rename = "clientCode")]
    pub client_code: String,
}

impl ClientRecord {
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    pub fn to_row(&self) -> RowValues {
        let mut row = RowValues::new();
        row.insert(columns::CLIENT_NAME.into(), Value::String(self.name.clone()));
        row.insert(columns::PAYER.into(), Value::String(self.payer.clone()));
        row.insert(
            columns::CLIENT_CODE.into(),
            Value::String(self.client_code.clone()),
        );
        row
    }
}
