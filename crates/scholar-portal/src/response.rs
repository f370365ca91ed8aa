//! One error contract for every portal call.
//!
//! A response either yields its parsed payload or collapses into a single
//! human-readable message. Known error shapes, in priority order:
//!
//! 1. `detail` as a list of field errors (`msg`, else `loc` path, else raw dump), joined with `; `
//! 2. `detail` as a scalar
//! 3. `error`
//! 4. `message`
//! 5. the raw body text, even when it is only `{}` or `null`
//!
//! An empty body on a failed call becomes `Server error <status>`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::transport::RawResponse;

pub const INVALID_RESPONSE: &str = "Invalid response from server.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The server claimed success but the body broke the expected contract.
    #[error("Invalid response from server.")]
    Malformed { status: u16 },
}

impl ResponseError {
    pub fn status(&self) -> u16 {
        match self {
            ResponseError::Rejected { status, .. } | ResponseError::Malformed { status } => *status,
        }
    }
}

/// Parse a response body, normalizing any failure into a [`ResponseError`].
pub fn parse_json(response: &RawResponse) -> Result<Value, ResponseError> {
    let status = response.status;
    let text = response.body.as_str();

    let parsed = if text.trim().is_empty() {
        Ok(Value::Object(Map::new()))
    } else {
        serde_json::from_str::<Value>(text)
    };

    match parsed {
        Err(_) if response.is_success() => Err(ResponseError::Malformed { status }),
        Err(_) => Err(ResponseError::Rejected {
            status,
            message: non_blank(text).unwrap_or_else(|| server_error(status)),
        }),
        Ok(data) if response.is_success() => Ok(data),
        Ok(data) => Err(ResponseError::Rejected {
            status,
            message: failure_message(&data, text, status),
        }),
    }
}

/// Parse and decode a success payload. A payload missing required fields is a
/// contract violation and reports as [`ResponseError::Malformed`].
pub fn decode<T>(response: &RawResponse) -> Result<T, ResponseError>
where
    T: DeserializeOwned,
{
    let data = parse_json(response)?;
    serde_json::from_value(data).map_err(|_| ResponseError::Malformed {
        status: response.status,
    })
}

/// Check the status only; a success body is not inspected.
pub fn ensure_success(response: &RawResponse) -> Result<(), ResponseError> {
    if response.is_success() {
        Ok(())
    } else {
        parse_json(response).map(|_| ())
    }
}

fn failure_message(data: &Value, text: &str, status: u16) -> String {
    if let Some(message) = data.get("detail").and_then(detail_message) {
        return message;
    }

    if let Some(message) = ["error", "message"]
        .iter()
        .find_map(|field| data.get(*field).and_then(scalar_message))
    {
        return message;
    }

    non_blank(text).unwrap_or_else(|| server_error(status))
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(field_error_message)
                .collect::<Vec<_>>()
                .join("; ");
            non_blank(&joined)
        }
        other => scalar_message(other),
    }
}

fn field_error_message(item: &Value) -> String {
    if let Value::String(text) = item {
        return text.clone();
    }

    if let Some(msg) = item.get("msg").and_then(Value::as_str) {
        if !msg.is_empty() {
            return msg.to_string();
        }
    }

    if let Some(path) = item.get("loc").and_then(Value::as_array) {
        let joined = path
            .iter()
            .map(|segment| match segment {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        if !joined.is_empty() {
            return joined;
        }
    }

    item.to_string()
}

/// Falsy values (null, false, 0, empty string) carry no message.
fn scalar_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => non_blank(text),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn server_error(status: u16) -> String {
    format!("Server error {status}")
}
