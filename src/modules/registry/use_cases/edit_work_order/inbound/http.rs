use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::registry::core::records::WorkOrderStatus;
use crate::modules::registry::use_cases::edit_work_order::command::{
    EditWorkOrder, WorkOrderChanges,
};
use crate::shell::http::application_error_response;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct EditWorkOrderBody {
    pub client: String,
    pub wo_no: String,
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

#[derive(Deserialize)]
pub struct WorkOrderStatusBody {
    pub client: String,
    pub wo_no: String,
    pub status: WorkOrderStatus,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<EditWorkOrderBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = EditWorkOrder {
        client: body.client,
        wo_no: body.wo_no,
        changes: WorkOrderChanges {
            wo_type: body.wo_type,
            pipe_type: body.pipe_type,
            diameter: body.diameter,
            planned_qty: body.planned_qty,
            price_type: body.price_type,
            price: body.price,
            transport: body.transport,
            transport_cost: body.transport_cost,
            status: body.status,
        },
    };
    respond(&state, command).await
}

pub async fn set_status(
    State(state): State<AppState>,
    body: Result<Json<WorkOrderStatusBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = EditWorkOrder {
        client: body.client,
        wo_no: body.wo_no,
        changes: WorkOrderChanges {
            status: Some(body.status),
            ..WorkOrderChanges::default()
        },
    };
    respond(&state, command).await
}

async fn respond(state: &AppState, command: EditWorkOrder) -> axum::response::Response {
    match state.edit_work_order.handle(command).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => application_error_response(e),
    }
}

#[cfg(test)]
mod edit_work_order_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::{patch, post},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::shell::state::AppState;
    use crate::tests::fixtures::state::make_test_state;

    use super::{handle, set_status};

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/work-orders", patch(handle))
            .route("/work-orders/status", post(set_status))
            .with_state(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app(make_test_state().await).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn it_should_close_a_work_order() {
        let (status, json) = send(
            Request::post("/work-orders/status")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"client":"Acme","wo_no":"100","status":"Closed"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "Closed");
    }

    #[tokio::test]
    async fn it_should_return_422_when_changing_the_type_of_a_used_work_order() {
        let (status, json) = send(
            Request::patch("/work-orders")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"client":"Acme","wo_no":"100","wo_type":"Coupling Replace"}"#,
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"].as_str().unwrap().contains("WO type cannot change"));
    }

    #[tokio::test]
    async fn it_should_return_422_on_an_unknown_status() {
        let (status, _) = send(
            Request::post("/work-orders/status")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"client":"Acme","wo_no":"100","status":"Archived"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
