//! # Request Handlers
//!
//! Axum request handlers for the relay API.
//! The order handler is the single entry point of the flow: every failure
//! is converted into a response envelope here.

use crate::state::AppState;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use relay_core::{PaymentRequest, RelayError, RelayResult};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, instrument, warn};

/// Headers carrying the original client address, in lookup order
const CLIENT_IP_HEADERS: &[&str] = &["x-nf-client-connection-ip", "x-forwarded-for"];

/// Largest order body accepted
pub const MAX_ORDER_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Map a relay error onto the response envelope
fn relay_error_to_response(err: RelayError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match err {
        RelayError::MethodNotAllowed { .. } => (
            status,
            [(header::ALLOW, "POST")],
            "Method not allowed",
        )
            .into_response(),
        RelayError::SessionAcquisitionFailed { raw } => {
            let body = ErrorResponse::new("Failed to obtain sessionToken").with_data(raw);
            (status, Json(body)).into_response()
        }
        RelayError::PaymentRejected { raw, .. } => {
            let body = ErrorResponse::new("Payment request failed").with_data(raw);
            (status, Json(body)).into_response()
        }
        other => (status, Json(ErrorResponse::new(other.to_string()))).into_response(),
    }
}

/// First client address found in the forwarding headers
fn client_ip(headers: &HeaderMap) -> Option<String> {
    CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(String::from)
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "nuvei-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.flow.provider_name(),
        "flow": state.flow.profile().name,
    }))
}

/// Buffer the body up to `MAX_ORDER_BODY_BYTES`
async fn read_body(body: Body) -> RelayResult<Bytes> {
    match Limited::new(body, MAX_ORDER_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(RelayError::PayloadTooLarge {
            limit: MAX_ORDER_BODY_BYTES,
        }),
        Err(e) => Err(RelayError::MalformedRequest(format!(
            "failed to read request body: {}",
            e
        ))),
    }
}

/// Create a gateway order and return the redirect target.
///
/// Takes the raw request so the verb is checked before any of the body is
/// read; non-POST requests get a 405 with `Allow: POST` whatever their size.
#[instrument(skip_all, fields(method = %request.method()))]
pub async fn create_order(State(state): State<AppState>, request: Request) -> Response {
    match initiate_order(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            if err.status_code() >= 500 {
                error!("Order initiation failed: {}", err);
            } else {
                warn!("Order initiation refused: {}", err);
            }
            relay_error_to_response(err)
        }
    }
}

async fn initiate_order(state: &AppState, request: Request) -> RelayResult<Response> {
    let (parts, body) = request.into_parts();
    if parts.method != Method::POST {
        return Err(RelayError::MethodNotAllowed {
            method: parts.method.to_string(),
        });
    }

    let body = read_body(body).await?;
    let request = PaymentRequest::from_slice(&body)?;
    let outcome = state.flow.initiate(request, client_ip(&parts.headers)).await?;

    Ok((StatusCode::OK, Json(outcome)).into_response())
}
