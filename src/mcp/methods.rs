//! Method table for the JSON-RPC dispatcher
//!
//! Routing is a lookup from exact method name to a handler object. Adding a
//! method means registering another handler, not editing control flow.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::domain::utils::{display_text, truthy};
use crate::errors::AppError;
use crate::mcp::server::{ServerInfo, SUPPORTED_PROTOCOL_VERSION};
use crate::AppState;

pub const DEMO_SESSION_ID: &str = "demo-session";
pub const DEMO_SESSION_TTL_SECS: u64 = 600;

#[async_trait]
pub trait MethodHandler: Send + Sync {
    async fn handle(&self, state: &AppState, params: Option<&Value>) -> Result<Value, AppError>;
}

/// A handler whose result does not depend on the request.
pub struct Fixed(pub fn() -> Value);

#[async_trait]
impl MethodHandler for Fixed {
    async fn handle(&self, _state: &AppState, _params: Option<&Value>) -> Result<Value, AppError> {
        Ok((self.0)())
    }
}

pub struct Initialize;

#[async_trait]
impl MethodHandler for Initialize {
    async fn handle(&self, state: &AppState, params: Option<&Value>) -> Result<Value, AppError> {
        let protocol_version = truthy(params.and_then(|params| params.get("protocolVersion")))
            .cloned()
            .unwrap_or_else(|| Value::String(SUPPORTED_PROTOCOL_VERSION.to_string()));

        Ok(initialize_result(protocol_version, &state.server_info))
    }
}

pub fn initialize_result(protocol_version: Value, server_info: &ServerInfo) -> Value {
    json!({
        "protocolVersion": protocol_version,
        "serverInfo": {
            "name": server_info.name,
            "version": server_info.version
        },
        "capabilities": {
            "tools": { "listChanged": false },
            "prompts": {},
            "resources": {},
            "roots": { "listChanged": false }
        }
    })
}

pub struct ListTools;

#[async_trait]
impl MethodHandler for ListTools {
    async fn handle(&self, state: &AppState, _params: Option<&Value>) -> Result<Value, AppError> {
        let tools = serde_json::to_value(state.tools.list_tools())
            .map_err(|err| AppError::server(err.to_string()))?;
        Ok(json!({ "tools": tools }))
    }
}

pub struct CallTool;

#[async_trait]
impl MethodHandler for CallTool {
    async fn handle(&self, state: &AppState, params: Option<&Value>) -> Result<Value, AppError> {
        let name = truthy(params.and_then(|params| params.get("name")))
            .map(display_text)
            .ok_or_else(|| AppError::invalid_params("missing name"))?;

        let empty = Map::new();
        let arguments = truthy(params.and_then(|params| params.get("arguments")))
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let result = state.tools.invoke(&name, arguments)?;
        serde_json::to_value(result).map_err(|err| AppError::server(err.to_string()))
    }
}

#[derive(Default)]
pub struct MethodTable {
    handlers: HashMap<&'static str, Box<dyn MethodHandler>>,
}

impl MethodTable {
    pub fn standard() -> Self {
        Self::default()
            .register("initialize", Initialize)
            .register("initialized", Fixed(ok))
            .register("notifications/initialized", Fixed(ok))
            .register(
                "sessions/create",
                Fixed(|| {
                    json!({
                        "sessionId": DEMO_SESSION_ID,
                        "expiresIn": DEMO_SESSION_TTL_SECS
                    })
                }),
            )
            .register("sessions/keepalive", Fixed(ok))
            .register("sessions/close", Fixed(ok))
            .register("ping", Fixed(|| json!({ "pong": true })))
            .register("roots/list", Fixed(|| json!({ "roots": [] })))
            .register("prompts/list", Fixed(|| json!({ "prompts": [] })))
            .register("resources/list", Fixed(|| json!({ "resources": [] })))
            .register("resources/read", Fixed(|| json!({ "contents": [] })))
            .register("tools/list", ListTools)
            .register("tools/call", CallTool)
    }

    pub fn register(
        mut self,
        method: &'static str,
        handler: impl MethodHandler + 'static,
    ) -> Self {
        self.handlers.insert(method, Box::new(handler));
        self
    }

    pub fn get(&self, method: &str) -> Option<&dyn MethodHandler> {
        self.handlers.get(method).map(Box::as_ref)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }
}

fn ok() -> Value {
    json!({ "ok": true })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_routes_every_documented_method() {
        let table = MethodTable::standard();
        for method in [
            "initialize",
            "initialized",
            "notifications/initialized",
            "sessions/create",
            "sessions/keepalive",
            "sessions/close",
            "ping",
            "roots/list",
            "prompts/list",
            "resources/list",
            "resources/read",
            "tools/list",
            "tools/call",
        ] {
            assert!(table.contains(method), "{method} should be routed");
        }
        assert!(!table.contains("foo/bar"));
        assert!(!table.contains("Ping"));
    }

    #[test]
    fn initialize_result_declares_fixed_capabilities() {
        let info = ServerInfo {
            name: "demo",
            version: "0.0.1",
        };
        let result = initialize_result(json!("2025-03-26"), &info);

        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "demo");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["capabilities"]["roots"]["listChanged"], false);
        assert_eq!(result["capabilities"]["prompts"], json!({}));
        assert_eq!(result["capabilities"]["resources"], json!({}));
    }
}
