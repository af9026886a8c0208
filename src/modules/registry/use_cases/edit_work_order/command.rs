use crate::modules::registry::core::records::WorkOrderStatus;

/// Fields of a work order the edit form may change. None leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderChanges {
    pub wo_type: Option<String>,
    pub pipe_type: Option<String>,
    pub diameter: Option<String>,
    pub planned_qty: Option<String>,
    pub price_type: Option<String>,
    pub price: Option<String>,
    pub transport: Option<String>,
    pub transport_cost: Option<String>,
    pub status: Option<WorkOrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditWorkOrder {
    pub client: String,
    pub wo_no: String,
    pub changes: WorkOrderChanges,
}
