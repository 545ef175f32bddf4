use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::tools::ToolError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const SERVER_ERROR: i32 = -32000;

/// Every failure the MCP endpoint can report. Each variant carries both its
/// JSON-RPC error code and the HTTP status the transport pairs it with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Parse error")]
    ParseError,
    #[error("Invalid Request: {reason}")]
    InvalidRequest { reason: &'static str },
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },
    #[error("Invalid params: {reason}")]
    InvalidParams { reason: &'static str },
    #[error("Internal error")]
    ToolFailed { message: String },
    #[error("Server error")]
    Server { message: String },
}

impl AppError {
    pub fn invalid_request(reason: &'static str) -> Self {
        Self::InvalidRequest { reason }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn invalid_params(reason: &'static str) -> Self {
        Self::InvalidParams { reason }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError => PARSE_ERROR,
            Self::InvalidRequest { .. } => INVALID_REQUEST,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::ToolFailed { .. } => INTERNAL_ERROR,
            Self::Server { .. } => SERVER_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ParseError | Self::InvalidRequest { .. } | Self::InvalidParams { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ToolFailed { .. } | Self::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured `error.data`, present only for failures raised while executing.
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::ToolFailed { message } | Self::Server { message } => {
                Some(json!({ "message": message }))
            }
            _ => None,
        }
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        Self::ToolFailed {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_code_taxonomy() {
        assert_eq!(AppError::ParseError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::invalid_request("jsonrpc must be 2.0").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::method_not_found("foo/bar").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_params("missing name").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::server("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn tool_failure_keeps_cause_in_data() {
        let err = AppError::from(ToolError::NotFound("unknown_tool".to_string()));

        assert_eq!(err.code(), INTERNAL_ERROR);
        assert_eq!(err.to_string(), "Internal error");
        assert_eq!(
            err.data(),
            Some(json!({ "message": "Unknown tool: unknown_tool" }))
        );
    }

    #[test]
    fn method_not_found_names_the_method() {
        let err = AppError::method_not_found("foo/bar");
        assert_eq!(err.to_string(), "Method not found: foo/bar");
        assert!(err.data().is_none());
    }
}
