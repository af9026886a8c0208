use crate::modules::registry::core::normalize::{normalize_integer, normalize_number};
use crate::modules::registry::core::records::{WorkOrder, WorkOrderStatus, columns};
use crate::modules::registry::use_cases::edit_work_order::{
    command::{EditWorkOrder, WorkOrderChanges},
    decision::{DecideError, Decision},
};
use crate::shared::infrastructure::workbook::RowValues;
use serde_json::Value;

pub const WO_TYPES: &[&str] = &["OCTG Inspection", "Coupling Replace"];
pub const PRICE_TYPES: &[&str] = &["Fixed", "Stage Based"];
pub const TRANSPORTS: &[&str] = &["Client", "TCC"];

pub fn decide_edit_work_order(
    work_order: Option<&WorkOrder>,
    batch_count: usize,
    command: EditWorkOrder,
) -> Decision {
    let Some(current) = work_order else {
        return Decision::Rejected {
            reason: DecideError::WorkOrderNotFound {
                client: command.client,
                wo_no: command.wo_no,
            },
        };
    };

    match apply_changes(current, batch_count, command.changes) {
        Ok((patch, _)) if patch.is_empty() => Decision::Rejected {
            reason: DecideError::NothingToChange,
        },
        Ok((patch, updated)) => Decision::Accepted { patch, updated },
        Err(reason) => Decision::Rejected { reason },
    }
}

fn apply_changes(
    current: &WorkOrder,
    batch_count: usize,
    changes: WorkOrderChanges,
) -> Result<(RowValues, WorkOrder), DecideError> {
    let mut updated = current.clone();
    let mut patch = RowValues::new();

    if let Some(raw) = changes.wo_type {
        let value = choice("WO type", WO_TYPES, &raw)?;
        guard_immutable("WO type", &current.wo_type, &value, batch_count)?;
        assign(&mut patch, columns::WO_TYPE, &mut updated.wo_type, value);
    }
    if let Some(raw) = changes.pipe_type {
        let value = raw.trim().to_string();
        guard_immutable("pipe type", &current.pipe_type, &value, batch_count)?;
        assign(&mut patch, columns::PIPE_TYPE, &mut updated.pipe_type, value);
    }
    if let Some(raw) = changes.diameter {
        assign(&mut patch, columns::DIAMETER, &mut updated.diameter, raw.trim().to_string());
    }
    if let Some(raw) = changes.planned_qty {
        assign(&mut patch, columns::PLANNED_QTY, &mut updated.planned_qty, normalize_integer(&raw));
    }
    if let Some(raw) = changes.price_type {
        let value = choice("price type", PRICE_TYPES, &raw)?;
        assign(&mut patch, columns::PRICE_TYPE, &mut updated.price_type, value);
    }
    if let Some(raw) = changes.price {
        assign(&mut patch, columns::PRICE, &mut updated.price, normalize_number(&raw));
    }
    if let Some(raw) = changes.transport {
        let value = choice("transport", TRANSPORTS, &raw)?;
        assign(&mut patch, columns::TRANSPORT, &mut updated.transport, value);
    }
    if let Some(raw) = changes.transport_cost {
        assign(
            &mut patch,
            columns::TRANSPORT_COST,
            &mut updated.transport_cost,
            normalize_number(&raw),
        );
    }
    if let Some(status) = changes.status {
        if status != current.status {
            if status == WorkOrderStatus::Closed && batch_count == 0 {
                return Err(DecideError::CloseWithoutBatches);
            }
            updated.status = status;
            patch.insert(columns::STATUS.into(), Value::String(status.label().into()));
        }
    }

    Ok((patch, updated))
}

fn choice(field: &'static str, allowed: &[&str], raw: &str) -> Result<String, DecideError> {
    allowed
        .iter()
        .find(|option| option.eq_ignore_ascii_case(raw.trim()))
        .map(|option| option.to_string())
        .ok_or_else(|| DecideError::InvalidChoice {
            field,
            value: raw.to_string(),
        })
}

fn guard_immutable(
    field: &'static str,
    current: &str,
    value: &str,
    batch_count: usize,
) -> Result<(), DecideError> {
    if batch_count > 0 && current.trim() != value {
        return Err(DecideError::ImmutableField {
            field,
            batches: batch_count,
        });
    }
    Ok(())
}

fn assign(patch: &mut RowValues, column: &str, slot: &mut String, value: String) {
    if slot.trim() == value {
        return;
    }
    patch.insert(column.into(), Value::String(value.clone()));
    *slot = value;
}
