//! The central Model Context Protocol engine
//!
//! Validates the JSON-RPC envelope, separates notifications from requests,
//! routes requests through the method table and pairs every JSON-RPC error with
//! its HTTP status. Nothing is remembered between requests.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::domain::utils::display_text;
use crate::errors::AppError;
use crate::mcp::rpc::{json_rpc_error, json_rpc_result, JSONRPC_VERSION};
use crate::AppState;

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

const MISSING_METHOD: &str = "undefined";

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// A success envelope for a request.
    Reply(Value),
    /// An error envelope; `id` is whatever the request carried.
    Failure { id: Option<Value>, error: AppError },
    /// A notification: acknowledged with no body.
    Acknowledged,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Reply(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Failure { id, error } => {
                let status = error.status();
                if status.is_server_error() {
                    error!(code = error.code(), data = ?error.data(), "mcp request failed");
                }
                (status, Json(json_rpc_error(id.as_ref(), &error))).into_response()
            }
            Self::Acknowledged => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Outcome {
    let id = payload.get("id").cloned();

    if payload.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Outcome::Failure {
            id,
            error: AppError::invalid_request("jsonrpc must be 2.0"),
        };
    }

    let method = payload.get("method");
    let Some(id) = id.filter(|id| !id.is_null()) else {
        debug!(
            method = %method.map(display_text).unwrap_or_default(),
            "notification acknowledged"
        );
        return Outcome::Acknowledged;
    };

    let params = payload.get("params");
    let routed = AssertUnwindSafe(route(state, method, params))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(AppError::server(panic_message(panic.as_ref()))));

    info!(
        method = %method.map(display_text).unwrap_or_default(),
        id = %id,
        params = %redact_audit_params(params),
        outcome = if routed.is_ok() { "success" } else { "failure" },
        "mcp action audited"
    );

    match routed {
        Ok(result) => Outcome::Reply(json_rpc_result(&id, result)),
        Err(error) => Outcome::Failure {
            id: Some(id),
            error,
        },
    }
}

async fn route(
    state: &AppState,
    method: Option<&Value>,
    params: Option<&Value>,
) -> Result<Value, AppError> {
    let handler = method
        .and_then(Value::as_str)
        .and_then(|name| state.methods.get(name));

    match handler {
        Some(handler) => handler.handle(state, params).await,
        None => Err(AppError::method_not_found(
            method.map_or_else(|| MISSING_METHOD.to_string(), display_text),
        )),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = panic.downcast_ref::<String>() {
        return message.clone();
    }
    "handler panicked".to_string()
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase().replace(['-', '_'], "");
    ["token", "secret", "password", "credential", "apikey", "authorization"]
        .iter()
        .any(|marker| normalized.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_sensitive_fields_in_audit_params() {
        let params = json!({
            "name": "greet",
            "arguments": {
                "name": "Ann",
                "api_key": "should-not-appear",
                "nested": [{ "access-token": "should-not-appear" }]
            }
        });

        let redacted = redact_audit_params(Some(&params));

        assert_eq!(redacted["name"], json!("greet"));
        assert_eq!(redacted["arguments"]["name"], json!("Ann"));
        assert_eq!(redacted["arguments"]["api_key"], json!("[REDACTED]"));
        assert_eq!(
            redacted["arguments"]["nested"][0]["access-token"],
            json!("[REDACTED]")
        );
    }

    #[test]
    fn missing_params_audit_as_null() {
        assert_eq!(redact_audit_params(None), Value::Null);
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let borrowed: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(5_u8);

        assert_eq!(panic_message(borrowed.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "handler panicked");
    }
}
