use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::warn;

use super::request::EvaluationRequest;
use super::service::EvaluationService;

/// Router builder exposing the evaluation endpoints.
pub fn evaluation_router(service: Arc<EvaluationService>) -> Router {
    Router::new()
        .route("/api/v1/evaluations", post(evaluate_handler))
        .route("/api/v1/evaluations/workflow", get(workflow_handler))
        .with_state(service)
}

pub(crate) async fn evaluate_handler(
    State(service): State<Arc<EvaluationService>>,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    match EvaluationRequest::from_value(&body) {
        Ok(request) => {
            let response = service.evaluate(&request);
            (StatusCode::OK, axum::Json(response)).into_response()
        }
        Err(error) => {
            warn!(error = %error, "rejected evaluation request");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn workflow_handler(
    State(service): State<Arc<EvaluationService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.blueprint())).into_response()
}
