//! # rpc-board
//!
//! Turns the type shape of a hierarchical RPC API into data, and that data
//! into an interactive, editable tree of procedure forms.
//!
//! ## Overview
//!
//! - **Type resolution**: a structural type graph is resolved into the
//!   portable [`ParsedType`] IR, with depth-bounded recursion
//! - **Operation tree**: a namespace of routers and procedures becomes a
//!   self-contained [`TreeData`] artifact
//! - **Forms**: each procedure input is classified field by field and
//!   mounted against a per-session [`InputStore`]
//! - **Board**: expansion state, rendering frames and open forms in one place
//!
//! ## Data flow
//!
//! ```text
//! type graph ──▶ Resolver ──▶ ParsedType ──▶ TreeBuilder ──▶ TreeData
//!                                                              │
//!                        VisibilityStore ──▶ render_tree ◀─────┤
//!                                                              ▼
//!                   InputStore ◀── mount_field ◀── describe_field
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rpc_board::prelude::*;
//!
//! let graph = TypeGraph::from_json(&std::fs::read_to_string("graph.json")?)?;
//! let config = BoardConfig::default();
//! let tree = TreeBuilder::new(&config).build(graph.root_ref()?)?;
//!
//! let mut board = Board::new(tree, config)?;
//! board.toggle("root.add")?;
//! let form = board.form_mut("root.add").expect("expanded");
//! form.set_value("root.a", InputValue::from(2.0))?;
//! println!("{}", form.payload()?);
//! ```
//!
//! ## Module Structure
//!
//! - [`graph`] - Structural type trait and the arena [`TypeGraph`]
//! - [`resolver`] - [`Resolver`] producing [`ParsedType`]
//! - [`tree`] - [`TreeData`] and the [`TreeBuilder`]
//! - [`store`] - [`InputStore`] sessions
//! - [`field`] - [`describe_field`] classification
//! - [`form`] - Mounting and [`ProcedureForm`]
//! - [`equality`] - [`deep_equal`] and [`FieldMemo`]
//! - [`visibility`] - [`VisibilityStore`]
//! - [`render`] - [`render_tree`] frames
//! - [`board`] - [`Board`]

pub mod board;
mod config;
pub mod equality;
mod error;
pub mod field;
pub mod form;
pub mod graph;
mod parsed_type;
pub mod render;
pub mod resolver;
pub mod store;
pub mod tree;
mod value;
pub mod visibility;

#[cfg(test)]
mod tests;

// Public API
pub use board::Board;
pub use config::{
    BoardConfig, ConfigValidationError, DEFAULT_INDENT_STEP, DEFAULT_INITIAL_EXPANDED,
    DEFAULT_MAX_DEPTH, DEFAULT_PROCEDURE_MARKER, DEFAULT_ROOT_PATH, MAX_DEPTH_LIMIT,
};
pub use equality::{deep_equal, DeepEqual, FieldMemo, FieldProps};
pub use error::{BoardError, BoardErrorCode, BoardResult};
pub use field::{
    describe_field, ChildField, Classification, EnumOption, FieldDescriptor, Nullish, ScalarKind,
};
pub use form::{mount_field, unmount, MountedField, ProcedureForm};
pub use graph::{
    GraphNode, IndexSignatureDecl, NodeShape, PropertyDecl, StructuralType, TypeGraph, TypeId,
    TypeRef,
};
pub use parsed_type::{BigIntText, BigIntTextError, LiteralValue, ParsedType};
pub use render::{outline, render_tree, Badge, FormSlot, Frame, FrameBody};
pub use resolver::{resolve, Resolver};
pub use store::{InputEntry, InputStore, ListenerId, SessionId, StoreState};
pub use tree::{ProcedureNode, ProcedureType, RouterNode, TreeBuilder, TreeChild, TreeData};
pub use value::InputValue;
pub use visibility::VisibilityStore;

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use rpc_board::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Board
        Board,
        // Errors
        BoardError,
        BoardErrorCode,
        BoardResult,
        // Configuration
        BoardConfig,
        // Fields and forms
        Classification,
        FieldDescriptor,
        InputStore,
        InputValue,
        MountedField,
        ParsedType,
        ProcedureForm,
        ProcedureType,
        // Type resolution
        Resolver,
        StructuralType,
        TreeBuilder,
        TreeData,
        TypeGraph,
        VisibilityStore,
    };
}
