//! Response normalization shared by both clients

use crate::{ApiFailure, ApiResult, Envelope};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Send a request; anything but a 2xx response becomes an [`ApiFailure`]
pub(crate) async fn send(request: RequestBuilder) -> ApiResult<Response> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "request failed before a response was received");
            return Err(ApiFailure::transport(e));
        }
    };

    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "received response");

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body
    };

    warn!(status = status.as_u16(), "provider returned an error");
    Err(ApiFailure::Status {
        http_status: status.as_u16(),
        message,
    })
}

/// Decode a successful response body
pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let http_status = response.status().as_u16();
    let body = response.bytes().await.map_err(ApiFailure::transport)?;
    decode(http_status, &body)
}

/// Decode a body the provider may leave empty; an empty body is `null`
pub(crate) async fn json_or_null(response: Response) -> ApiResult<Value> {
    let http_status = response.status().as_u16();
    let body = response.bytes().await.map_err(ApiFailure::transport)?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    decode(http_status, &body)
}

fn decode<T: DeserializeOwned>(http_status: u16, body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiFailure::InvalidBody {
        http_status,
        message: e.to_string(),
    })
}

/// Wrap a successful response in a confirmation envelope
pub(crate) fn envelope(response: &Response, message: impl Into<String>) -> Envelope {
    Envelope::new(response.status().as_u16(), message.into())
}
