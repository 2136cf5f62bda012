//! Error types for board operations
//!
//! Every failure the resolver, tree builder, field engine or input store can
//! report is a [`BoardError`] carrying a [`BoardErrorCode`], a message and,
//! where one exists, the dotted path and type tag that caused it.
//!
//! # Error Codes
//!
//! When serialized, codes are converted to SCREAMING_SNAKE_CASE strings.
//!
//! # Example
//! ```rust,ignore
//! use rpc_board::{BoardError, BoardErrorCode};
//!
//! let error = BoardError::unsupported_shape("root.record", "index", "cannot render an index field");
//! assert_eq!(error.code, BoardErrorCode::UnsupportedShape);
//! ```

use crate::config::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type-safe error codes for board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardErrorCode {
    /// A type or union shape outside the supported heuristics
    UnsupportedShape,
    /// The resolver passed its depth bound
    DepthExceeded,
    /// An operation node is missing its input, output or kind
    MalformedOperation,
    /// The input store was used outside an active session
    StoreMisuse,
    /// A type graph failed validation
    InvalidGraph,
    /// A value does not fit the field it was written to
    InvalidValue,
    /// A tree or field path does not exist
    NotFound,
    /// The board configuration failed validation
    InvalidConfig,
    /// JSON serialization/deserialization failed
    SerializationError,
}

impl BoardErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedShape => "UNSUPPORTED_SHAPE",
            Self::DepthExceeded => "DEPTH_EXCEEDED",
            Self::MalformedOperation => "MALFORMED_OPERATION",
            Self::StoreMisuse => "STORE_MISUSE",
            Self::InvalidGraph => "INVALID_GRAPH",
            Self::InvalidValue => "INVALID_VALUE",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true if the condition is recovered locally (sentinel or placeholder).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DepthExceeded | Self::MalformedOperation)
    }
}

impl fmt::Display for BoardErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Board error with type-safe code, message and attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}{}", attribution(.path, .tag))]
pub struct BoardError {
    /// Type-safe error code
    pub code: BoardErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Dotted path of the offending field or node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Type tag of the offending shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn attribution(path: &Option<String>, tag: &Option<String>) -> String {
    match (path, tag) {
        (Some(path), Some(tag)) => format!(" (at '{path}', type '{tag}')"),
        (Some(path), None) => format!(" (at '{path}')"),
        (None, Some(tag)) => format!(" (type '{tag}')"),
        (None, None) => String::new(),
    }
}

impl BoardError {
    /// Create a new error with code and message.
    pub fn new(code: BoardErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            tag: None,
        }
    }

    /// Attach the dotted path that produced the error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the type tag that produced the error.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns true if the error is recovered locally.
    pub fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }

    // Convenience constructors

    /// Create an UNSUPPORTED_SHAPE error.
    pub fn unsupported_shape(
        path: impl Into<String>,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(BoardErrorCode::UnsupportedShape, message)
            .with_path(path)
            .with_tag(tag)
    }

    /// Create a DEPTH_EXCEEDED error.
    pub fn depth_exceeded(path: impl Into<String>, max_depth: usize) -> Self {
        Self::new(
            BoardErrorCode::DepthExceeded,
            format!("type nesting exceeds max depth {}", max_depth),
        )
        .with_path(path)
    }

    /// Create a MALFORMED_OPERATION error.
    pub fn malformed_operation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::MalformedOperation, message).with_path(path)
    }

    /// Create a STORE_MISUSE error.
    pub fn store_misuse(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::StoreMisuse, message)
    }

    /// Create an INVALID_GRAPH error.
    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::InvalidGraph, message)
    }

    /// Create an INVALID_VALUE error.
    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::InvalidValue, message).with_path(path)
    }

    /// Create a NOT_FOUND error.
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(BoardErrorCode::NotFound, format!("'{}' not found", path)).with_path(path)
    }

    /// Create a SERIALIZATION_ERROR error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(BoardErrorCode::SerializationError, message)
    }
}

impl From<ConfigValidationError> for BoardError {
    fn from(err: ConfigValidationError) -> Self {
        Self::new(BoardErrorCode::InvalidConfig, err.to_string())
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Result type alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
