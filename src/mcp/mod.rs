//! Model Context Protocol JSON-RPC handling
//!
//! Provides envelope shaping, request classification and the method table.

pub mod methods;
pub mod rpc;
pub mod server;
