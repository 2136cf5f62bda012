//! Configuration module for the board.
//!
//! This module provides the [`BoardConfig`] struct for customizing how type
//! graphs are resolved and how the operation tree is presented.
//!
//! # Example
//! ```rust,ignore
//! use rpc_board::BoardConfig;
//!
//! let config = BoardConfig::new()
//!     .with_max_depth(8)
//!     .with_opaque_type("Instant")
//!     .without_initial_expanded();
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default depth bound for type resolution.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted depth bound. Resolution recurses once per level.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Default property name marking a procedure node in a namespace graph.
pub const DEFAULT_PROCEDURE_MARKER: &str = "__procedure";

/// Default first segment of tree and form paths.
pub const DEFAULT_ROOT_PATH: &str = "root";

/// Default path expanded when the tree is first shown.
pub const DEFAULT_INITIAL_EXPANDED: &str = "root.greeting";

/// Default indentation per tree level.
pub const DEFAULT_INDENT_STEP: u32 = 30;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// max_depth must be between 1 and [`MAX_DEPTH_LIMIT`]
    InvalidMaxDepth,
    /// opaque type names must be non-empty strings
    EmptyOpaqueTypeName,
    /// procedure_marker must not be empty
    EmptyProcedureMarker,
    /// root_path must be a single non-empty segment
    InvalidRootPath(String),
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxDepth => {
                write!(f, "max_depth must be between 1 and {}", MAX_DEPTH_LIMIT)
            }
            Self::EmptyOpaqueTypeName => write!(f, "opaque_type_names must not contain empty names"),
            Self::EmptyProcedureMarker => write!(f, "procedure_marker must not be empty"),
            Self::InvalidRootPath(root) => {
                write!(f, "root_path '{}' must be a single non-empty segment", root)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Board configuration.
///
/// All fields have defaults that give the stock board layout, so
/// [`BoardConfig::default()`] works out of the box.
///
/// # Fields
///
/// * `max_depth` - Resolver depth bound. Deeper nodes resolve to an `unknown`
///   sentinel. Default: 32.
///
/// * `opaque_type_names` - Symbol names resolved to the opaque `Date` variant
///   instead of being expanded. Default: `["Date"]`.
///
/// * `procedure_marker` - Property whose presence marks a namespace member as
///   a procedure. Default: `__procedure`.
///
/// * `root_path` - First segment of every tree and form path. Default: `root`.
///
/// * `initial_expanded` - Path expanded when the tree is first shown.
///   Default: `root.greeting`.
///
/// * `indent_step` - Horizontal indentation per tree level. Default: 30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Resolver depth bound (default: 32)
    pub max_depth: usize,
    /// Names of opaque wrapper types (default: ["Date"])
    pub opaque_type_names: Vec<String>,
    /// Procedure marker property (default: "__procedure")
    pub procedure_marker: String,
    /// Root path segment (default: "root")
    pub root_path: String,
    /// Initially expanded path (default: "root.greeting")
    pub initial_expanded: Option<String>,
    /// Indentation per tree level (default: 30)
    pub indent_step: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            opaque_type_names: vec!["Date".to_string()],
            procedure_marker: DEFAULT_PROCEDURE_MARKER.to_string(),
            root_path: DEFAULT_ROOT_PATH.to_string(),
            initial_expanded: Some(DEFAULT_INITIAL_EXPANDED.to_string()),
            indent_step: DEFAULT_INDENT_STEP,
        }
    }
}

impl BoardConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigValidationError::InvalidMaxDepth);
        }
        if self.opaque_type_names.iter().any(|name| name.is_empty()) {
            return Err(ConfigValidationError::EmptyOpaqueTypeName);
        }
        if self.procedure_marker.is_empty() {
            return Err(ConfigValidationError::EmptyProcedureMarker);
        }
        if self.root_path.is_empty() || self.root_path.contains('.') {
            return Err(ConfigValidationError::InvalidRootPath(self.root_path.clone()));
        }
        Ok(())
    }

    /// The depth bound actually applied, capped at [`MAX_DEPTH_LIMIT`] even
    /// when the configuration was never validated.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_LIMIT)
    }

    /// Returns true if `name` is a recognized opaque wrapper.
    pub fn is_opaque(&self, name: &str) -> bool {
        self.opaque_type_names.iter().any(|opaque| opaque == name)
    }

    /// Set the resolver depth bound.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = BoardConfig::new().with_max_depth(8);
    /// ```
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Add an opaque wrapper type name.
    pub fn with_opaque_type(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.is_opaque(&name) {
            self.opaque_type_names.push(name);
        }
        self
    }

    /// Set the procedure marker property.
    pub fn with_procedure_marker(mut self, marker: impl Into<String>) -> Self {
        self.procedure_marker = marker.into();
        self
    }

    /// Set the root path segment.
    pub fn with_root_path(mut self, root: impl Into<String>) -> Self {
        self.root_path = root.into();
        self
    }

    /// Set the initially expanded path.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = BoardConfig::new().with_initial_expanded("root.users");
    /// ```
    pub fn with_initial_expanded(mut self, path: impl Into<String>) -> Self {
        self.initial_expanded = Some(path.into());
        self
    }

    /// Start with every tree node collapsed.
    pub fn without_initial_expanded(mut self) -> Self {
        self.initial_expanded = None;
        self
    }

    /// Set the indentation per tree level.
    pub fn with_indent_step(mut self, step: u32) -> Self {
        self.indent_step = step;
        self
    }
}
