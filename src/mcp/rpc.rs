//! JSON-RPC envelope formatting
//!
//! Ids the MCP schema can represent (strings and integers) go through the typed
//! envelopes; any other id is echoed verbatim so the response id always matches
//! the request id by value and type.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub const JSONRPC_VERSION: &str = "2.0";

pub fn json_rpc_result(id: &Value, result: Value) -> Value {
    if let (Some(request_id), Value::Object(extra)) = (value_to_request_id(id), &result) {
        let response = JsonrpcResultResponse::new(
            request_id,
            McpResult {
                meta: None,
                extra: Some(extra.clone()),
            },
        );
        if let Ok(value) = serde_json::to_value(response) {
            return value;
        }
    }

    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result
    })
}

pub fn json_rpc_error(id: Option<&Value>, err: &AppError) -> Value {
    let message = err.to_string();
    let data = err.data();

    // A null id is echoed as `"id": null`, which the typed envelope cannot express.
    let request_id = match id {
        None => None,
        Some(value) => match value_to_request_id(value) {
            Some(request_id) => Some(request_id),
            None => return raw_error(id, err.code(), message, data),
        },
    };

    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(err.code()),
            data: data.clone(),
            message: message.clone(),
        },
        request_id,
    );
    serde_json::to_value(response).unwrap_or_else(|_| raw_error(id, err.code(), message, data))
}

fn raw_error(id: Option<&Value>, code: i32, message: String, data: Option<Value>) -> Value {
    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data {
        error["data"] = data;
    }

    let mut response = json!({ "jsonrpc": JSONRPC_VERSION, "error": error });
    if let Some(id) = id {
        response["id"] = id.clone();
    }
    response
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_echoes_integer_and_string_ids() {
        let numeric = json_rpc_result(&json!(7), json!({ "pong": true }));
        assert_eq!(numeric["id"], json!(7));
        assert_eq!(numeric["jsonrpc"], "2.0");
        assert_eq!(numeric["result"]["pong"], true);

        let textual = json_rpc_result(&json!("abc"), json!({ "pong": true }));
        assert_eq!(textual["id"], json!("abc"));
    }

    #[test]
    fn result_echoes_fractional_id_verbatim() {
        let response = json_rpc_result(&json!(1.5), json!({ "ok": true }));
        assert_eq!(response["id"], json!(1.5));
        assert_eq!(response["result"]["ok"], true);
    }

    #[test]
    fn error_carries_code_message_and_data() {
        let response = json_rpc_error(Some(&json!(3)), &AppError::server("boom"));
        assert_eq!(response["id"], json!(3));
        assert_eq!(response["error"]["code"], -32000);
        assert_eq!(response["error"]["message"], "Server error");
        assert_eq!(response["error"]["data"]["message"], "boom");
        assert!(response.get("result").is_none());
    }

    #[test]
    fn error_without_id_has_no_result() {
        let response = json_rpc_error(None, &AppError::ParseError);
        assert_eq!(response["error"]["code"], -32700);
        assert!(response.get("result").is_none());
        assert!(response.get("id").is_none());
    }

    #[test]
    fn error_keeps_explicit_null_id() {
        let response = json_rpc_error(
            Some(&Value::Null),
            &AppError::invalid_request("jsonrpc must be 2.0"),
        );
        assert_eq!(response.get("id"), Some(&Value::Null));
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["jsonrpc"], "2.0");
    }
}
