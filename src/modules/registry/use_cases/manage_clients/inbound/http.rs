use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::registry::use_cases::manage_clients::command::{AddClient, RenameClient};
use crate::shell::http::application_error_response;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct AddClientBody {
    pub name: String,
    #[serde(default)]
    pub payer: String,
}

#[derive(Deserialize)]
pub struct RenameClientBody {
    pub current_name: String,
    pub new_name: String,
}

pub async fn add(
    State(state): State<AppState>,
    body: Result<Json<AddClientBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = AddClient {
        name: body.name,
        payer: body.payer,
    };
    match state.manage_clients.add(command).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => application_error_response(e),
    }
}

pub async fn rename(
    State(state): State<AppState>,
    body: Result<Json<RenameClientBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = RenameClient {
        current_name: body.current_name,
        new_name: body.new_name,
    };
    match state.manage_clients.rename(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => application_error_response(e),
    }
}
