use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::json;

use crate::modules::registry::core::allocation::AllocationError;
use crate::modules::registry::use_cases::browse_datasets::inbound::http as browse_http;
use crate::modules::registry::use_cases::edit_work_order::inbound::http as work_order_http;
use crate::modules::registry::use_cases::errors::ApplicationError;
use crate::modules::registry::use_cases::manage_clients::inbound::http as clients_http;
use crate::modules::registry::use_cases::record_inspection::inbound::http as inspection_http;
use crate::modules::registry::use_cases::register_batch::inbound::http as register_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/datasets/{dataset}", get(browse_http::handle))
        .route("/datasets/{dataset}/refresh", post(browse_http::refresh))
        .route("/batches/next", get(register_http::next))
        .route("/batches", post(register_http::handle))
        .route("/inspections", post(inspection_http::handle))
        .route("/work-orders", patch(work_order_http::handle))
        .route("/work-orders/status", post(work_order_http::set_status))
        .route("/clients", post(clients_http::add))
        .route("/clients/rename", post(clients_http::rename))
        .with_state(state)
}

/// Maps a use case failure onto a status and an `{"error": ..}` body.
/// A stale allocation also carries the corrected allocation so the form can redisplay it.
pub fn application_error_response(error: ApplicationError) -> Response {
    let message = error.to_string();
    match error {
        ApplicationError::Allocation(AllocationError::StaleAllocation { current, .. }) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": message, "current": current })),
        )
            .into_response(),
        ApplicationError::Allocation(_) | ApplicationError::Domain(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": message }))).into_response()
        }
        ApplicationError::Refresh(_) | ApplicationError::Workbook(_) => {
            tracing::warn!(error = %message, "remote workbook failure");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
        }
        ApplicationError::Unexpected(_) => {
            tracing::error!(error = %message, "unexpected failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}
