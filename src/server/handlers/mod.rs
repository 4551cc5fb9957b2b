//! HTTP handlers for the server.

pub mod print;
pub mod status;

use async_trait::async_trait;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::error;

use crate::error::{BlueposError, Result};

/// JSON request body whose rejections are [`BlueposError::InvalidRequest`].
///
/// Malformed, mistyped or out-of-range bodies get the same 400 JSON error
/// body as any other invalid parameter.
pub struct JsonForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = BlueposError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| BlueposError::InvalidRequest(e.body_text()))?;
        parse_form(&body).map(JsonForm)
    }
}

/// Deserialize a request body, mapping serde errors to `InvalidRequest`.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| BlueposError::InvalidRequest(format!("invalid request body: {}", e)))
}

/// Errors map onto statuses by who is at fault: the request (4xx) or the
/// link to the printer (5xx).
///
/// | Error | Status |
/// |-------|--------|
/// | `InvalidRequest`, `EncodingPrecondition` | 400 |
/// | `TransportWrite` | 502 |
/// | `Connection` | 503 |
/// | `Timeout` | 504 |
/// | `Config`, `Io` | 500 |
impl IntoResponse for BlueposError {
    fn into_response(self) -> Response {
        let status = match &self {
            BlueposError::InvalidRequest(_) | BlueposError::EncodingPrecondition(_) => {
                StatusCode::BAD_REQUEST
            }
            BlueposError::TransportWrite(_) => StatusCode::BAD_GATEWAY,
            BlueposError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            BlueposError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            BlueposError::Config(_) | BlueposError::Io(_) => {
                error!(error = %self, "internal error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}
