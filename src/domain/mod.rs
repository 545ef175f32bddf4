//! Tool catalog and invocation
//!
//! Provides the built-in tools exposed over the MCP `tools/*` methods.

pub mod tools;
pub mod utils;
