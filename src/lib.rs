use std::{
    sync::{atomic::AtomicUsize, Arc},
    time::Duration,
};

use axum::{middleware, routing::get, Router};

pub mod config;
pub mod cors;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use domain::tools::ToolRegistry;
use http::handlers::{HEALTH_PATH, MCP_PATH};
use mcp::{methods::MethodTable, server::ServerInfo};

/// Read-only configuration shared by every request, plus the open-channel gauge.
#[derive(Clone)]
pub struct AppState {
    pub server_info: Arc<ServerInfo>,
    pub tools: Arc<ToolRegistry>,
    pub methods: Arc<MethodTable>,
    pub keepalive_interval: Duration,
    pub open_channels: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(keepalive_interval: Duration) -> Self {
        Self::with_methods(keepalive_interval, MethodTable::standard())
    }

    pub fn with_methods(keepalive_interval: Duration, methods: MethodTable) -> Self {
        Self {
            server_info: Arc::new(ServerInfo::default()),
            tools: Arc::new(ToolRegistry::builtin()),
            methods: Arc::new(methods),
            keepalive_interval,
            open_channels: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::descriptor))
        .route(HEALTH_PATH, get(http::handlers::health))
        .route(
            MCP_PATH,
            get(http::events::event_stream).post(http::handlers::mcp_endpoint),
        )
        .layer(middleware::from_fn(cors::allow_any_origin))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
