//! Route handlers: identity banner, health check, scoring.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::audit::{normalize, AuditRecord, RequestContext};
use crate::http::middleware::audit::AuditHandled;
use crate::http::server::AppState;
use crate::model::features::{self, CovidData};

/// `GET /`: liveness and identity banner, no side effects.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Covid-19 Prediction API",
        "message": "Predicts case evolution from reported figures",
    }))
}

/// `GET /health`: exercises the scoring path with an all-zero vector.
///
/// Always answers 200: a broken model is reported in the body, never as
/// a transport failure.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let zeros = vec![0.0; features::FEATURE_COUNT];
    match state.model.score(&zeros) {
        Ok(scored) => Json(json!({
            "status": "ok",
            "model": state.model.name(),
            "prediction": scored.class,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Health check scoring failed");
            Json(json!({
                "status": "error",
                "detail": e.to_string(),
            }))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub request_id: Uuid,
    pub prediction: i64,
    pub probability: f64,
    pub features_used: usize,
    pub response_time_ms: f64,
}

/// `POST /predict`: score one case snapshot.
///
/// Writes its own audit record, richer than the generic middleware one,
/// and marks the response so the middleware does not write a second.
pub async fn predict(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(data): Json<CovidData>,
) -> Response {
    let input_data = normalize::to_log_string(&data);
    let features = features::assemble(&data);

    let (mut response, record) = match state.model.score(&features) {
        Ok(scored) => {
            let elapsed = ctx.close();
            tracing::info!(
                request_id = %ctx.request_id(),
                prediction = scored.class,
                "Prediction served"
            );
            let record = AuditRecord {
                request_id: ctx.request_id(),
                endpoint: "/predict".to_string(),
                method: "POST".to_string(),
                input_data,
                prediction: Some(scored.class),
                probability: Some(scored.confidence()),
                features_used: Some(features.len()),
                status_code: StatusCode::OK.as_u16(),
                response_time_ms: elapsed,
                error_message: None,
            };
            let body = PredictResponse {
                request_id: ctx.request_id(),
                prediction: scored.class,
                probability: scored.confidence(),
                features_used: features.len(),
                response_time_ms: elapsed,
            };
            ((StatusCode::OK, Json(body)).into_response(), record)
        }
        Err(e) => {
            let elapsed = ctx.close();
            tracing::error!(request_id = %ctx.request_id(), error = %e, "Prediction failed");
            let record = AuditRecord {
                request_id: ctx.request_id(),
                endpoint: "/predict".to_string(),
                method: "POST".to_string(),
                input_data,
                prediction: None,
                probability: None,
                features_used: None,
                status_code: StatusCode::BAD_REQUEST.as_u16(),
                response_time_ms: elapsed,
                error_message: Some(e.to_string()),
            };
            (
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "detail": e.to_string() })),
                )
                    .into_response(),
                record,
            )
        }
    };

    if let Err(e) = state.audit.append(&record).await {
        tracing::warn!(request_id = %ctx.request_id(), error = %e, "Failed to write audit record");
    }
    response.extensions_mut().insert(AuditHandled);
    response
}
