use crate::modules::registry::core::normalize::normalize_date_str;
use crate::modules::registry::core::records::{BatchRecord, columns};
use crate::modules::registry::core::stages::{cascade, validate_accounting, validate_cascade};
use crate::modules::registry::core::status::BatchStatus;
use crate::modules::registry::use_cases::record_inspection::{
    command::RecordInspection,
    decision::{DecideError, Decision},
};
use crate::shared::infrastructure::workbook::RowValues;
use serde_json::Value;

pub fn decide_record_inspection(batch: Option<&BatchRecord>, command: RecordInspection) -> Decision {
    let Some(batch) = batch else {
        return Decision::Rejected {
            reason: DecideError::BatchNotFound {
                client: command.client,
                wo_no: command.wo_no,
                batch: command.batch,
            },
        };
    };

    let total = batch.quantity();
    if total == 0 {
        return Decision::Rejected {
            reason: DecideError::EmptyBatch {
                batch: batch.batch.clone(),
            },
        };
    }
    if let Err(e) = validate_cascade(total, &command.scraps)
        .and_then(|_| validate_accounting(total, &command.classification, &command.scraps))
    {
        return Decision::Rejected { reason: e.into() };
    }

    let current = batch.batch_status();
    let status = if current.is_inspected() {
        current
    } else {
        BatchStatus::InspectionDone
    };

    let stages = cascade(total, &command.scraps);
    let mut patch = RowValues::new();
    for entry in &stages {
        patch.insert(entry.stage.label().into(), Value::String(entry.available.to_string()));
        patch.insert(
            entry.stage.scrap_column().into(),
            Value::String(entry.scrap.to_string()),
        );
    }
    let classification = command.classification;
    for (column, value) in [
        (columns::CLASS_1, classification.class_1),
        (columns::CLASS_2, classification.class_2),
        (columns::CLASS_3, classification.class_3),
        (columns::REPAIR, classification.repair),
    ] {
        patch.insert(column.into(), Value::String(value.to_string()));
    }
    for (column, raw) in [
        (columns::START_DATE, &command.start_date),
        (columns::END_DATE, &command.end_date),
    ] {
        let date = normalize_date_str(raw);
        if !date.is_empty() {
            patch.insert(column.into(), Value::String(date));
        }
    }
    if status != current {
        patch.insert(columns::STATUS.into(), Value::String(status.label().into()));
    }

    Decision::Accepted {
        patch,
        status,
        cascade: stages,
    }
}
