//! Request forwarding to the upstream LLM backends.
//!
//! - [`azure`]: Azure OpenAI chat completions
//! - [`ollama`]: local Ollama text generation
//!
//! Both backends share the same linear flow: build the outbound body, POST it
//! once as JSON, and hand the upstream status and JSON body back unchanged.

pub mod azure;
pub mod ollama;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::error::RelayError;

/// An upstream response, relayed to the caller as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// POST `body` to `url` and parse the reply as JSON. No retries.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &Value,
) -> Result<Relayed, RelayError> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    debug!(url, status = status.as_u16(), "Upstream responded");

    let body = response.json::<Value>().await?;
    Ok(Relayed { status, body })
}

/// Parse an inbound request body. An empty body is treated as `{}`; only
/// objects and arrays are accepted at the top level.
pub fn parse_inbound(raw: &Bytes) -> Result<Value, RelayError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_slice::<Value>(raw).map_err(RelayError::InvalidBody)? {
        body @ (Value::Object(_) | Value::Array(_)) => Ok(body),
        _ => Err(RelayError::UnexpectedBodyShape),
    }
}

/// Look up `key` on an inbound body, treating `null`, `false`, `0` and `""`
/// the same as a missing field.
pub(crate) fn present_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
