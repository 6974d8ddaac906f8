//! Schema checks applied to every success body before it reaches the store.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{extract_message, ApiError};
use crate::model::Acknowledgement;

/// Parses a success body as `T`.
///
/// Accepts the bare payload or the `{"success": .., "data": ..}` envelope.
/// An envelope reporting `"success": false` is turned into a server error.
///
/// # Errors
///
/// Returns a [`Parse`](super::ApiErrorKind::Parse) error when the body is not
/// JSON or does not match `T`.
pub fn parse_payload<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::parse(format!("response is not valid JSON: {e}")))?;
    let inner = unwrap_envelope(status, value)?;
    serde_json::from_value(inner)
        .map_err(|e| ApiError::parse(format!("unexpected response shape: {e}")))
}

/// Parses the body of cancel, stop and delete. An empty body is accepted.
///
/// # Errors
///
/// Returns a parse error for a non-empty body that is not a JSON object.
pub fn parse_acknowledgement(status: u16, body: &str) -> Result<Acknowledgement, ApiError> {
    if body.trim().is_empty() {
        return Ok(Acknowledgement::default());
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::parse(format!("response is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(ApiError::parse("acknowledgement is not a JSON object"));
    }
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(envelope_failure(status, &value));
    }
    let message = value.get("message").and_then(Value::as_str).map(String::from);
    Ok(Acknowledgement { message })
}

fn unwrap_envelope(status: u16, value: Value) -> Result<Value, ApiError> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return Ok(other),
    };
    match map.get("success").and_then(Value::as_bool) {
        None => Ok(Value::Object(map)),
        Some(false) => Err(envelope_failure(status, &Value::Object(map))),
        Some(true) => {
            map.remove("data").ok_or_else(|| ApiError::parse("response envelope has no data"))
        }
    }
}

fn envelope_failure(status: u16, value: &Value) -> ApiError {
    let mut err = ApiError::server(status, "");
    err.message = extract_message(Some(value), None);
    err
}
