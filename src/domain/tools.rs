//! Built-in tools exposed via Model Context Protocol
//!
//! The registry is a fixed, ordered catalog built once at startup and shared
//! read-only by every request. Each tool pairs its descriptor with a pure
//! function from arguments to response text.

use std::collections::HashMap;

use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, TextContent, Tool, ToolInputSchema};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::utils::{display_text, truthy};

pub const HELLO_WORLD_TOOL: &str = "hello_world";
pub const GREET_TOOL: &str = "greet";

const HELLO_WORLD_FALLBACK: &str = "Hello World from MCP Demo!";
const GUEST_NAME: &str = "Guest";

pub type ToolArguments = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),
}

pub struct ToolRegistry {
    tools: Vec<Tool>,
    // runners[i] executes tools[i]
    runners: Vec<fn(&ToolArguments) -> String>,
}

impl ToolRegistry {
    pub fn builtin() -> Self {
        let tools = vec![
            tool(
                HELLO_WORLD_TOOL,
                "Outputs a Hello World message",
                vec![],
                [(
                    "message",
                    json!({
                        "type": "string",
                        "description": "Optional custom message",
                        "default": "Hello World"
                    }),
                )],
            ),
            tool(
                GREET_TOOL,
                "Sends a greeting message",
                vec!["name"],
                [(
                    "name",
                    json!({
                        "type": "string",
                        "description": "Name to greet"
                    }),
                )],
            ),
        ];
        let runners: Vec<fn(&ToolArguments) -> String> = vec![hello_world, greet];

        Self { tools, runners }
    }

    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn invoke(
        &self,
        name: &str,
        arguments: &ToolArguments,
    ) -> Result<CallToolResult, ToolError> {
        let run = self
            .tools
            .iter()
            .position(|tool| tool.name == name)
            .and_then(|index| self.runners.get(index))
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        Ok(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(
                run(arguments),
                None,
                None,
            ))],
            is_error: None,
            meta: None,
            structured_content: None,
        })
    }
}

fn tool<const N: usize>(
    name: &str,
    description: &str,
    required: Vec<&str>,
    properties: [(&str, Value); N],
) -> Tool {
    let properties = properties
        .into_iter()
        .map(|(key, schema)| {
            let schema = match schema {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            (key.to_string(), schema)
        })
        .collect::<HashMap<_, _>>();

    Tool {
        annotations: None,
        description: Some(description.to_string()),
        execution: None,
        icons: vec![],
        input_schema: ToolInputSchema::new(
            required.into_iter().map(str::to_string).collect(),
            Some(properties),
            None,
        ),
        meta: None,
        name: name.to_string(),
        output_schema: None,
        title: None,
    }
}

fn hello_world(arguments: &ToolArguments) -> String {
    truthy(arguments.get("message"))
        .map(display_text)
        .unwrap_or_else(|| HELLO_WORLD_FALLBACK.to_string())
}

// `name` is declared required in the schema but a missing one is tolerated.
fn greet(arguments: &ToolArguments) -> String {
    let name = truthy(arguments.get("name"))
        .map(display_text)
        .unwrap_or_else(|| GUEST_NAME.to_string());
    format!("Hello, {name}! Welcome to MCP Demo!")
}
