// Schema-tolerant parsing of header + data rows into registry records.
//
// Purpose
// - Map whatever the sheet's header row currently says onto record fields, so renamed or reordered
//   columns keep working.
//
// Matching
// - Headers are canonicalised: lowercase, alphanumerics only ("WO_No." -> "wono").
// - A field is located by exact canonical match first, then by substring containment, skipping
//   headers that contain one of the field's exclusions (stage columns exclude "scrap").
//
// Failure model
// - Never fails as a whole. Rows without a required identity value are skipped and reported as
//   ParseWarning; absent optional columns read as "". Non-array input parses to an empty table.

use crate::modules::registry::core::normalize::{cell_to_string, normalize_date};
use crate::modules::registry::core::records::{
    BatchRecord, ClientRecord, WorkOrder, WorkOrderStatus,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

struct ColumnRule {
    field: &'static str,
    exact: &'static [&'static str],
    contains: &'static [&'static str],
    excludes: &'static [&'static str],
}

const fn rule(
    field: &'static str,
    exact: &'static [&'static str],
    contains: &'static [&'static str],
    excludes: &'static [&'static str],
) -> ColumnRule {
    ColumnRule {
        field,
        exact,
        contains,
        excludes,
    }
}

const SCRAP: &[&str] = &["scrap"];

const BATCH_RULES: &[ColumnRule] = &[
    rule("client", &["client", "clientname"], &["client"], &["code"]),
    rule("wo_no", &["wono", "wo", "workorder"], &["wono", "workorder", "wonumber", "wo"], &["type"]),
    rule("batch", &["batch"], &["batch"], &[]),
    rule("diameter", &["diameter", "dia"], &["diameter", "size"], &[]),
    rule("qty", &["qty", "quantity"], &["qty", "quantity"], &["planned"]),
    rule("pipe_from", &["pipefrom", "from"], &["pipefrom"], &[]),
    rule("pipe_to", &["pipeto", "to"], &["pipeto"], &[]),
    rule("rack", &["rack"], &["rack"], &[]),
    rule("arrival_date", &["arrivaldate", "arrival"], &["arrival"], &[]),
    rule("start_date", &["startdate", "start"], &["startdate"], &[]),
    rule("end_date", &["enddate", "end"], &["enddate", "finishdate"], &[]),
    rule("rattling", &["rattling"], &["rattling"], SCRAP),
    rule("external", &["external"], &["external"], SCRAP),
    rule("hydro", &["hydro", "jetting"], &["hydro", "jetting"], SCRAP),
    rule("mpi", &["mpi"], &["mpi"], SCRAP),
    rule("drift", &["drift"], &["drift"], SCRAP),
    rule("emi", &["emi"], &["emi"], SCRAP),
    rule("marking", &["marking"], &["marking"], SCRAP),
    rule("rattling_scrap", &[], &["rattlingscrap", "scraprattling"], &[]),
    rule("external_scrap", &[], &["externalscrap", "scrapexternal"], &[]),
    rule("hydro_scrap", &[], &["hydroscrap", "jettingscrap", "scraphydro"], &[]),
    rule("mpi_scrap", &[], &["mpiscrap", "scrapmpi"], &[]),
    rule("drift_scrap", &[], &["driftscrap", "scrapdrift"], &[]),
    rule("emi_scrap", &[], &["emiscrap", "scrapemi"], &[]),
    rule("marking_scrap", &[], &["markingscrap", "scrapmarking"], &[]),
    rule("class_1", &["class1"], &["class1"], &[]),
    rule("class_2", &["class2"], &["class2"], &[]),
    rule("class_3", &["class3"], &["class3"], &[]),
    rule("repair", &["repair"], &["repair"], &[]),
    rule("status", &["status"], &["status"], &[]),
    rule("load_out_date", &["loadoutdate", "loadout"], &["loadoutdate", "loadout"], &[]),
    rule("act_no_oper", &["actnooper", "actno"], &["actnooper", "actno", "actnumber"], &[]),
    rule("act_date", &["actdate"], &["actdate"], &[]),
];

const WORK_ORDER_RULES: &[ColumnRule] = &[
    rule("client", &["client", "clientname"], &["client"], &["code"]),
    rule("wo_no", &["wono", "wo", "workorder"], &["wono", "workorderno", "wonumber"], &["type"]),
    rule("wo_type", &["wotype", "type"], &["wotype", "workordertype"], &["pipe", "price"]),
    rule("pipe_type", &["pipetype"], &["pipetype"], &[]),
    rule("diameter", &["diameter", "dia"], &["diameter", "size"], &[]),
    rule("planned_qty", &["plannedqty", "qty"], &["planned", "qty", "quantity"], &[]),
    rule("price_type", &["pricetype"], &["pricetype"], &[]),
    rule("price", &["price"], &["price"], &["type"]),
    rule("transport", &["transport"], &["transport"], &["cost"]),
    rule("transport_cost", &["transportcost"], &["transportcost", "cost"], &[]),
    rule("status", &["status"], &["status"], &[]),
];

const CLIENT_RULES: &[ColumnRule] = &[
    rule("name", &["name", "clientname", "client"], &["clientname", "name"], &["code", "payer"]),
    rule("payer", &["payer"], &["payer"], &[]),
    rule("client_code", &["clientcode", "code"], &["clientcode", "code"], &[]),
];

pub fn canonical_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Where each known field sits in the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    columns: BTreeMap<&'static str, usize>,
}

impl ColumnMap {
    fn locate(headers: &[Value], rules: &[ColumnRule]) -> Self {
        let canonical: Vec<String> = headers
            .iter()
            .map(|h| canonical_header(&cell_to_string(h)))
            .collect();
        let columns = rules
            .iter()
            .filter_map(|rule| find_column(&canonical, rule).map(|index| (rule.field, index)))
            .collect();
        Self { columns }
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    fn text(&self, cells: &[Value], field: &str) -> String {
        self.index_of(field)
            .and_then(|index| cells.get(index))
            .map(|cell| cell_to_string(cell).trim().to_string())
            .unwrap_or_default()
    }

    fn date(&self, cells: &[Value], field: &str) -> String {
        self.index_of(field)
            .and_then(|index| cells.get(index))
            .map(normalize_date)
            .unwrap_or_default()
    }
}

fn find_column(headers: &[String], rule: &ColumnRule) -> Option<usize> {
    rule.exact
        .iter()
        .find_map(|needle| headers.iter().position(|h| h == needle))
        .or_else(|| {
            rule.contains.iter().find_map(|needle| {
                headers.iter().position(|h| {
                    h.contains(needle) && !rule.excludes.iter().any(|x| h.contains(x))
                })
            })
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingHeaderRow,
    NotARow,
    MissingIdentity { fields: Vec<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// Index into the input, header row included.
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable<T> {
    pub columns: ColumnMap,
    pub records: Vec<T>,
    pub warnings: Vec<ParseWarning>,
}

impl<T> Default for ParsedTable<T> {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

fn parse_table<T>(
    rows: &Value,
    rules: &[ColumnRule],
    required: &[&'static str],
    build: impl Fn(&ColumnMap, &[Value]) -> T,
) -> ParsedTable<T> {
    let Some(rows) = rows.as_array() else {
        return ParsedTable::default();
    };
    let Some((header, data)) = rows.split_first() else {
        return ParsedTable::default();
    };
    let Some(headers) = header.as_array() else {
        return ParsedTable {
            warnings: vec![ParseWarning {
                row: 0,
                reason: SkipReason::MissingHeaderRow,
            }],
            ..ParsedTable::default()
        };
    };

    let columns = ColumnMap::locate(headers, rules);
    let mut records = Vec::with_capacity(data.len());
    let mut warnings = Vec::new();

    for (offset, row) in data.iter().enumerate() {
        let row_index = offset + 1;
        let Some(cells) = row.as_array() else {
            warnings.push(ParseWarning {
                row: row_index,
                reason: SkipReason::NotARow,
            });
            continue;
        };
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|field| columns.text(cells, field).is_empty())
            .collect();
        if !missing.is_empty() {
            warnings.push(ParseWarning {
                row: row_index,
                reason: SkipReason::MissingIdentity { fields: missing },
            });
            continue;
        }
        records.push(build(&columns, cells));
    }

    ParsedTable {
        columns,
        records,
        warnings,
    }
}

pub fn parse_batch_records(rows: &Value) -> ParsedTable<BatchRecord> {
    parse_table(
        rows,
        BATCH_RULES,
        &["client", "wo_no", "batch"],
        |columns, cells| BatchRecord {
            client: columns.text(cells, "client"),
            wo_no: columns.text(cells, "wo_no"),
            batch: columns.text(cells, "batch"),
            diameter: columns.text(cells, "diameter"),
            qty: columns.text(cells, "qty"),
            pipe_from: columns.text(cells, "pipe_from"),
            pipe_to: columns.text(cells, "pipe_to"),
            rack: columns.text(cells, "rack"),
            arrival_date: columns.date(cells, "arrival_date"),
            start_date: columns.date(cells, "start_date"),
            end_date: columns.date(cells, "end_date"),
            rattling: columns.text(cells, "rattling"),
            external: columns.text(cells, "external"),
            hydro: columns.text(cells, "hydro"),
            mpi: columns.text(cells, "mpi"),
            drift: columns.text(cells, "drift"),
            emi: columns.text(cells, "emi"),
            marking: columns.text(cells, "marking"),
            rattling_scrap: columns.text(cells, "rattling_scrap"),
            external_scrap: columns.text(cells, "external_scrap"),
            hydro_scrap: columns.text(cells, "hydro_scrap"),
            mpi_scrap: columns.text(cells, "mpi_scrap"),
            drift_scrap: columns.text(cells, "drift_scrap"),
            emi_scrap: columns.text(cells, "emi_scrap"),
            marking_scrap: columns.text(cells, "marking_scrap"),
            class_1: columns.text(cells, "class_1"),
            class_2: columns.text(cells, "class_2"),
            class_3: columns.text(cells, "class_3"),
            repair: columns.text(cells, "repair"),
            status: columns.text(cells, "status"),
            load_out_date: columns.date(cells, "load_out_date"),
            act_no_oper: columns.text(cells, "act_no_oper"),
            act_date: columns.date(cells, "act_date"),
        },
    )
}

pub fn parse_work_orders(rows: &Value) -> ParsedTable<WorkOrder> {
    parse_table(
        rows,
        WORK_ORDER_RULES,
        &["client", "wo_no"],
        |columns, cells| WorkOrder {
            client: columns.text(cells, "client"),
            wo_no: columns.text(cells, "wo_no"),
            wo_type: columns.text(cells, "wo_type"),
            pipe_type: columns.text(cells, "pipe_type"),
            diameter: columns.text(cells, "diameter"),
            planned_qty: columns.text(cells, "planned_qty"),
            price_type: columns.text(cells, "price_type"),
            price: columns.text(cells, "price"),
            transport: columns.text(cells, "transport"),
            transport_cost: columns.text(cells, "transport_cost"),
            status: WorkOrderStatus::parse(&columns.text(cells, "status")),
        },
    )
}

pub fn parse_client_records(rows: &Value) -> ParsedTable<ClientRecord> {
    parse_table(rows, CLIENT_RULES, &["name"], |columns, cells| ClientRecord {
        name: columns.text(cells, "name"),
        payer: columns.text(cells, "payer"),
        client_code: columns.text(cells, "client_code"),
    })
}

#[cfg(test)]
mod table_parser_tests {
    use super::*;
    use crate::tests::fixtures::records::{BatchRecordBuilder, tubing_rows};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("WO_No.", "wono")]
    #[case(" Pipe - From ", "pipefrom")]
    #[case("Class #1", "class1")]
    fn it_should_canonicalize_headers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonical_header(raw), expected);
    }

    #[rstest]
    fn it_should_parse_the_minimal_sheet_and_skip_the_malformed_row() {
        let rows = json!([["Client", "WO", "Batch"], ["Acme", "100", "Batch # 1"], [null]]);
        let parsed = parse_batch_records(&rows);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].client, "Acme");
        assert_eq!(parsed.records[0].wo_no, "100");
        assert_eq!(parsed.records[0].batch, "Batch # 1");
        assert_eq!(parsed.records[0].qty, "");
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning {
                row: 2,
                reason: SkipReason::MissingIdentity {
                    fields: vec!["client", "wo_no", "batch"]
                },
            }]
        );
    }

    #[rstest]
    fn it_should_return_an_empty_table_for_non_array_input() {
        assert!(parse_batch_records(&json!({"rows": []})).records.is_empty());
        assert!(parse_batch_records(&json!(null)).warnings.is_empty());
        assert!(parse_batch_records(&json!([])).records.is_empty());
    }

    #[rstest]
    fn it_should_warn_about_rows_that_are_not_arrays() {
        let parsed = parse_batch_records(&json!([["Client", "WO No", "Batch"], "oops"]));
        assert_eq!(parsed.warnings[0].reason, SkipReason::NotARow);

        let headerless = parse_batch_records(&json!(["Client", ["Acme"]]));
        assert_eq!(headerless.warnings[0].reason, SkipReason::MissingHeaderRow);
    }

    #[rstest]
    fn it_should_tolerate_reordered_and_renamed_columns() {
        let rows = json!([
            ["Batch No", "Pipe To", "Qty", "Pipe_From", "Work Order", "Client Name", "Arrival"],
            ["Batch # 2", 240, 120.0, 121, 100, " Acme ", 45000]
        ]);
        let parsed = parse_batch_records(&rows);
        let record = &parsed.records[0];

        assert_eq!(record.client, "Acme");
        assert_eq!(record.wo_no, "100");
        assert_eq!(record.batch, "Batch # 2");
        assert_eq!(record.qty, "120");
        assert_eq!(record.pipe_from, "121");
        assert_eq!(record.pipe_to, "240");
        assert_eq!(record.arrival_date, "2023-03-15");
        assert_eq!(parsed.columns.index_of("rack"), None);
    }

    #[rstest]
    fn it_should_keep_stage_quantities_and_scraps_apart() {
        let record = BatchRecordBuilder::new()
            .stage(crate::modules::registry::core::stages::Stage::Hydro, "90")
            .scrap(crate::modules::registry::core::stages::Stage::Hydro, "4")
            .build();
        let parsed = parse_batch_records(&tubing_rows(&[record.clone()]));
        assert_eq!(parsed.records, vec![record]);
    }

    #[rstest]
    fn it_should_parse_work_orders_and_clients() {
        let work_orders = parse_work_orders(&json!([
            ["Client", "WO No", "WO Type", "Pipe Type", "Price Type", "Price", "Transport", "Transport Cost", "Status"],
            ["Acme", 100, "OCTG Inspection", "Tubing", "Fixed", 12.5, "TCC", 300, "Closed"],
            ["", 101, "", "", "", "", "", "", ""]
        ]));
        assert_eq!(work_orders.records.len(), 1);
        let wo = &work_orders.records[0];
        assert_eq!(wo.wo_type, "OCTG Inspection");
        assert_eq!(wo.pipe_type, "Tubing");
        assert_eq!(wo.price, "12.5");
        assert_eq!(wo.transport, "TCC");
        assert_eq!(wo.transport_cost, "300");
        assert_eq!(wo.status, WorkOrderStatus::Closed);
        assert_eq!(work_orders.warnings.len(), 1);

        let clients = parse_client_records(&json!([
            ["Client Name", "Payer", "Client Code"],
            ["Acme", "Acme Holdings", "C-001"]
        ]));
        assert_eq!(clients.records[0].client_code, "C-001");
        assert_eq!(clients.records[0].payer, "Acme Holdings");
    }
}
