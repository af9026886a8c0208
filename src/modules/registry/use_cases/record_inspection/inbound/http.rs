use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::modules::registry::core::stages::{Classification, Stage, StageScraps};
use crate::modules::registry::use_cases::record_inspection::command::RecordInspection;
use crate::shell::http::application_error_response;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct RecordInspectionBody {
    pub client: String,
    pub wo_no: String,
    pub batch: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Scrap per stage; stages left out count as 0.
    #[serde(default)]
    pub scraps: BTreeMap<Stage, u32>,
    #[serde(default)]
    pub class_1: u32,
    #[serde(default)]
    pub class_2: u32,
    #[serde(default)]
    pub class_3: u32,
    #[serde(default)]
    pub repair: u32,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<RecordInspectionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let scraps = body
        .scraps
        .iter()
        .fold(StageScraps::new(), |scraps, (stage, scrap)| {
            scraps.with(*stage, *scrap)
        });
    let command = RecordInspection {
        client: body.client,
        wo_no: body.wo_no,
        batch: body.batch,
        start_date: body.start_date,
        end_date: body.end_date,
        scraps,
        classification: Classification {
            class_1: body.class_1,
            class_2: body.class_2,
            class_3: body.class_3,
            repair: body.repair,
        },
    };

    match state.record_inspection.handle(command).await {
        Ok(recorded) => (StatusCode::OK, Json(recorded)).into_response(),
        Err(e) => application_error_response(e),
    }
}
