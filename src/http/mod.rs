//! HTTP transport layer for the Model Context Protocol
//!
//! Provides the `/mcp` JSON-RPC and event-stream endpoints plus metadata endpoints.

pub mod events;
pub mod handlers;
