use axum::{
    Json,
    extract::rejection::QueryRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::modules::registry::cache::dataset::Dataset;
use crate::shell::http::application_error_response;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub force: bool,
}

pub async fn handle(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<BrowseQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    browse(&state, &name, query.force).await
}

/// Explicit "Update Data": always reads the remote workbook.
pub async fn refresh(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    browse(&state, &name, true).await
}

async fn browse(state: &AppState, name: &str, force: bool) -> axum::response::Response {
    let dataset = match name.parse::<Dataset>() {
        Ok(dataset) => dataset,
        Err(e) => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))).into_response();
        }
    };
    match state.browse_datasets.handle(dataset, force).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => application_error_response(e),
    }
}
