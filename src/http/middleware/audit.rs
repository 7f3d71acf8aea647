//! Request audit middleware.
//!
//! Every inbound call is wrapped: a correlation and timing context opens
//! before the handler runs and exactly one audit record is written after
//! it returns. The scoring handler writes its own richer record and
//! marks the response, so no request is ever recorded twice.

use axum::body::{self, Body};
use axum::extract::State;
use axum::http::{Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use crate::audit::{normalize, AuditRecord, RequestContext};
use crate::http::server::AppState;

/// Marker inserted into a response by a handler that already wrote the
/// audit record for its request.
#[derive(Debug, Clone, Copy)]
pub struct AuditHandled;

/// Sentinel stored when a request body cannot be captured as JSON.
pub const UNPARSEABLE_BODY: &str = "<unparseable body>";

const CAPTURE_LIMIT: usize = 64 * 1024;

pub async fn audit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::open();
    let endpoint = req.uri().path().to_string();
    let method = req.method().to_string();

    let (mut req, input_data) = if wants_body_capture(req.method(), &endpoint) {
        capture_body(req).await
    } else {
        (req, String::new())
    };
    req.extensions_mut().insert(ctx);

    // The handler always runs; the interceptor never rejects a request.
    let response = next.run(req).await;

    if response.extensions().get::<AuditHandled>().is_some() {
        return response;
    }

    let status = response.status();
    let record = AuditRecord {
        request_id: ctx.request_id(),
        endpoint,
        method,
        input_data,
        prediction: None,
        probability: None,
        features_used: None,
        status_code: status.as_u16(),
        response_time_ms: ctx.close(),
        error_message: if status.is_client_error() || status.is_server_error() {
            status.canonical_reason().map(str::to_string)
        } else {
            None
        },
    };

    if let Err(e) = state.audit.append(&record).await {
        tracing::warn!(request_id = %ctx.request_id(), error = %e, "Failed to write audit record");
    }

    response
}

/// Buffer and normalize a request body for audit, handing back an
/// equivalent request. Capture failures degrade to a sentinel marker,
/// never to a rejected request.
async fn capture_body(req: Request<Body>) -> (Request<Body>, String) {
    let (parts, raw) = req.into_parts();
    match body::to_bytes(raw, CAPTURE_LIMIT).await {
        Ok(bytes) => {
            let input_data = if bytes.is_empty() {
                String::new()
            } else {
                match serde_json::from_slice::<Value>(&bytes) {
                    Ok(value) => normalize::to_log_string(&value),
                    Err(_) => UNPARSEABLE_BODY.to_string(),
                }
            };
            (Request::from_parts(parts, Body::from(bytes)), input_data)
        }
        Err(_) => (
            Request::from_parts(parts, Body::empty()),
            UNPARSEABLE_BODY.to_string(),
        ),
    }
}

/// The scoring endpoint parses and audits its own body; only other
/// data-carrying calls are captured here.
fn wants_body_capture(method: &Method, path: &str) -> bool {
    if path == "/predict" {
        return false;
    }
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}
