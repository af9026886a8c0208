// Shared test fixtures for registry records and the sheets they live in.

use crate::modules::registry::core::records::{BatchRecord, ClientRecord, WorkOrder, columns};
use crate::modules::registry::core::stages::Stage;
use serde_json::{Value, json};

pub struct BatchRecordBuilder {
    inner: BatchRecord,
}

impl Default for BatchRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl BatchRecordBuilder {
    pub fn new() -> Self {
        Self {
            inner: BatchRecord {
                client: "Acme".into(),
                wo_no: "100".into(),
                batch: "Batch # 1".into(),
                diameter: "2 7/8".into(),
                qty: "100".into(),
                pipe_from: "1".into(),
                pipe_to: "100".into(),
                rack: "R1".into(),
                arrival_date: "2024-03-05".into(),
                status: "RECEIVED - AWAITING INSPECTION".into(),
                ..BatchRecord::default()
            },
        }
    }

    pub fn client(mut self, v: impl Into<String>) -> Self {
        self.inner.client = v.into();
        self
    }

    pub fn wo_no(mut self, v: impl Into<String>) -> Self {
        self.inner.wo_no = v.into();
        self
    }

    pub fn batch(mut self, v: impl Into<String>) -> Self {
        self.inner.batch = v.into();
        self
    }

    pub fn qty(mut self, v: impl Into<String>) -> Self {
        self.inner.qty = v.into();
        self
    }

    pub fn pipe_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.inner.pipe_from = from.into();
        self.inner.pipe_to = to.into();
        self
    }

    pub fn pipe_to(mut self, v: impl Into<String>) -> Self {
        self.inner.pipe_to = v.into();
        self
    }

    pub fn stage(mut self, stage: Stage, v: impl Into<String>) -> Self {
        let v = v.into();
        match stage {
            Stage::Rattling => self.inner.rattling = v,
            Stage::External => self.inner.external = v,
            Stage::Hydro => self.inner.hydro = v,
            Stage::Mpi => self.inner.mpi = v,
            Stage::Drift => self.inner.drift = v,
            Stage::Emi => self.inner.emi = v,
            Stage::Marking => self.inner.marking = v,
        }
        self
    }

    pub fn scrap(mut self, stage: Stage, v: impl Into<String>) -> Self {
        let v = v.into();
        match stage {
            Stage::Rattling => self.inner.rattling_scrap = v,
            Stage::External => self.inner.external_scrap = v,
            Stage::Hydro => self.inner.hydro_scrap = v,
            Stage::Mpi => self.inner.mpi_scrap = v,
            Stage::Drift => self.inner.drift_scrap = v,
            Stage::Emi => self.inner.emi_scrap = v,
            Stage::Marking => self.inner.marking_scrap = v,
        }
        self
    }

    pub fn classes(
        mut self,
        class_1: impl Into<String>,
        class_2: impl Into<String>,
        class_3: impl Into<String>,
        repair: impl Into<String>,
    ) -> Self {
        self.inner.class_1 = class_1.into();
        self.inner.class_2 = class_2.into();
        self.inner.class_3 = class_3.into();
        self.inner.repair = repair.into();
        self
    }

    pub fn status(mut self, v: impl Into<String>) -> Self {
        self.inner.status = v.into();
        self
    }

    pub fn build(self) -> BatchRecord {
        self.inner
    }
}

pub fn tubing_headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        columns::CLIENT,
        columns::WO_NO,
        columns::BATCH,
        columns::DIAMETER,
        columns::QTY,
        columns::PIPE_FROM,
        columns::PIPE_TO,
        columns::RACK,
        columns::ARRIVAL_DATE,
        columns::START_DATE,
        columns::END_DATE,
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    for stage in Stage::ORDER {
        headers.push(stage.label().to_string());
        headers.push(stage.scrap_column().to_string());
    }
    headers.extend(
        [
            columns::CLASS_1,
            columns::CLASS_2,
            columns::CLASS_3,
            columns::REPAIR,
            columns::STATUS,
            columns::LOAD_OUT_DATE,
            columns::ACT_NO_OPER,
            columns::ACT_DATE,
        ]
        .iter()
        .map(|h| h.to_string()),
    );
    headers
}

fn tubing_cells(record: &BatchRecord) -> Vec<Value> {
    let mut cells: Vec<&str> = vec![
        &record.client,
        &record.wo_no,
        &record.batch,
        &record.diameter,
        &record.qty,
        &record.pipe_from,
        &record.pipe_to,
        &record.rack,
        &record.arrival_date,
        &record.start_date,
        &record.end_date,
    ];
    for stage in Stage::ORDER {
        cells.push(record.stage_quantity(stage));
        cells.push(record.stage_scrap(stage));
    }
    cells.extend([
        record.class_1.as_str(),
        &record.class_2,
        &record.class_3,
        &record.repair,
        &record.status,
        &record.load_out_date,
        &record.act_no_oper,
        &record.act_date,
    ]);
    cells.into_iter().map(|c| json!(c)).collect()
}

pub fn tubing_sheet(records: &[BatchRecord]) -> Vec<Vec<Value>> {
    let mut rows = vec![tubing_headers().into_iter().map(Value::String).collect()];
    rows.extend(records.iter().map(tubing_cells));
    rows
}

pub fn tubing_rows(records: &[BatchRecord]) -> Value {
    Value::Array(tubing_sheet(records).into_iter().map(Value::Array).collect())
}

pub fn work_order_sheet(work_orders: &[WorkOrder]) -> Vec<Vec<Value>> {
    let headers = [
        columns::CLIENT,
        columns::WO_NO,
        columns::WO_TYPE,
        columns::PIPE_TYPE,
        columns::DIAMETER,
        columns::PLANNED_QTY,
        columns::PRICE_TYPE,
        columns::PRICE,
        columns::TRANSPORT,
        columns::TRANSPORT_COST,
        columns::STATUS,
    ];
    let mut rows = vec![headers.iter().map(|h| json!(h)).collect::<Vec<Value>>()];
    rows.extend(work_orders.iter().map(|wo| {
        vec![
            json!(wo.client),
            json!(wo.wo_no),
            json!(wo.wo_type),
            json!(wo.pipe_type),
            json!(wo.diameter),
            json!(wo.planned_qty),
            json!(wo.price_type),
            json!(wo.price),
            json!(wo.transport),
            json!(wo.transport_cost),
            json!(wo.status.label()),
        ]
    }));
    rows
}

pub fn make_work_order() -> WorkOrder {
    WorkOrder {
        client: "Acme".into(),
        wo_no: "100".into(),
        wo_type: "OCTG Inspection".into(),
        pipe_type: "Tubing".into(),
        diameter: "2 7/8".into(),
        planned_qty: "500".into(),
        price_type: "Fixed".into(),
        price: "12.5".into(),
        transport: "TCC".into(),
        transport_cost: "300".into(),
        ..WorkOrder::default()
    }
}

pub fn client_sheet(clients: &[ClientRecord]) -> Vec<Vec<Value>> {
    let mut rows = vec![vec![
        json!(columns::CLIENT_NAME),
        json!(columns::PAYER),
        json!(columns::CLIENT_CODE),
    ]];
    rows.extend(
        clients
            .iter()
            .map(|c| vec![json!(c.name), json!(c.payer), json!(c.client_code)]),
    );
    rows
}

pub fn make_client(name: &str, code: &str) -> ClientRecord {
    ClientRecord {
        name: name.into(),
        payer: name.into(),
        client_code: code.into(),
    }
}

pub fn client_name_sheet(names: &[&str]) -> Vec<Vec<Value>> {
    let mut rows = vec![vec![json!(columns::CLIENT_NAME)]];
    rows.extend(names.iter().map(|name| vec![json!(name)]));
    rows
}
