use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::registry::core::allocation::{BatchAllocation, batch_number};
use crate::modules::registry::use_cases::register_batch::command::RegisterBatch;
use crate::shell::http::application_error_response;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct NextBatchQuery {
    pub client: String,
    pub wo_no: String,
    pub qty: u32,
}

#[derive(Serialize)]
pub struct NextBatchResponse {
    /// Identifies the form instance the allocation was shown in.
    pub session_id: String,
    pub allocation: BatchAllocation,
}

#[derive(Deserialize)]
pub struct RegisterBatchBody {
    pub client: String,
    pub wo_no: String,
    pub batch: String,
    pub pipe_from: u32,
    pub qty: u32,
    #[serde(default)]
    pub diameter: String,
    #[serde(default)]
    pub rack: String,
    #[serde(default)]
    pub arrival_date: String,
    /// `session_id` from the preview that displayed this allocation.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterBatchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub allocation: BatchAllocation,
}

pub async fn next(
    State(state): State<AppState>,
    query: Result<Query<NextBatchQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    match state
        .register_batch
        .preview(&query.client, &query.wo_no, query.qty)
        .await
    {
        Ok(allocation) => (
            StatusCode::OK,
            Json(NextBatchResponse {
                session_id: Uuid::now_v7().to_string(),
                allocation,
            }),
        )
            .into_response(),
        Err(e) => application_error_response(e),
    }
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<RegisterBatchBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let shown = BatchAllocation {
        batch_number: batch_number(&body.batch).unwrap_or(0),
        batch: body.batch,
        qty: body.qty,
        pipe_from: body.pipe_from,
        pipe_to: body.pipe_from.saturating_add(body.qty).saturating_sub(1),
    };
    let command = RegisterBatch {
        client: body.client,
        wo_no: body.wo_no,
        shown,
        diameter: body.diameter,
        rack: body.rack,
        arrival_date: body.arrival_date,
        session_id: body.session_id,
    };
    let session_id = command.session_id.clone();

    match state.register_batch.handle(command).await {
        Ok(allocation) => (
            StatusCode::CREATED,
            Json(RegisterBatchResponse {
                session_id,
                allocation,
            }),
        )
            .into_response(),
        Err(e) => application_error_response(e),
    }
}
