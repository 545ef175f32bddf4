//! Axum HTTP handlers for the web server
//!
//! Provides the JSON-RPC entry point and the descriptor and health endpoints.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::mcp::server::{handle_json_rpc_value, Outcome, SUPPORTED_PROTOCOL_VERSION};
use crate::AppState;

pub const MCP_PATH: &str = "/mcp";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub mcp: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub protocol: &'static str,
    pub protocol_version: &'static str,
    pub endpoints: Endpoints,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "hello world",
    })
}

pub async fn descriptor(State(state): State<AppState>) -> Json<DescriptorResponse> {
    Json(DescriptorResponse {
        name: state.server_info.name,
        version: state.server_info.version,
        protocol: "MCP",
        protocol_version: SUPPORTED_PROTOCOL_VERSION,
        endpoints: Endpoints {
            mcp: MCP_PATH,
            health: HEALTH_PATH,
        },
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    // An empty body reads as an empty envelope and fails the version check.
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(_) => {
                return Outcome::Failure {
                    id: Some(Value::Null),
                    error: AppError::ParseError,
                }
                .into_response()
            }
        }
    };

    handle_json_rpc_value(&state, payload).await.into_response()
}
