//! Operation tree
//!
//! [`TreeData`] is the self-contained description of an API: routers nest,
//! procedures are leaves carrying resolved input/output types. The
//! [`TreeBuilder`] walks a namespace node of a type graph and produces it.

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::graph::StructuralType;
use crate::parsed_type::ParsedType;
use crate::resolver::{join_path, Resolver};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Property holding a procedure's input type.
const INPUT_PROPERTY: &str = "input";
/// Property holding a procedure's output type.
const OUTPUT_PROPERTY: &str = "output";
/// Property holding a procedure's kind literal.
const KIND_PROPERTY: &str = "procedureType";

/// Kind of procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureType {
    Query,
    Mutation,
}

impl fmt::Display for ProcedureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// A node of the operation tree, tagged by `__board_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__board_type", rename_all = "lowercase")]
pub enum TreeData {
    Router(RouterNode),
    Procedure(ProcedureNode),
}

/// A group of named children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterNode {
    /// Set only on the outermost router
    #[serde(rename = "isRoot", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_root: bool,
    pub children: Vec<TreeChild>,
}

/// A named child of a router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeChild {
    pub name: String,
    #[serde(rename = "treeData")]
    pub tree_data: TreeData,
}

/// An invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureNode {
    pub procedure_type: ProcedureType,
    pub input_type: ParsedType,
    pub output_type: ParsedType,
    pub input_type_string: String,
    pub output_type_string: String,
}

impl TreeData {
    /// An empty, non-root router.
    pub fn placeholder() -> Self {
        Self::Router(RouterNode::default())
    }

    /// Returns true for routers.
    pub fn is_router(&self) -> bool {
        matches!(self, Self::Router(_))
    }

    /// Children of a router; empty for procedures.
    pub fn children(&self) -> &[TreeChild] {
        match self {
            Self::Router(router) => &router.children,
            Self::Procedure(_) => &[],
        }
    }

    /// Look up a node by dotted path relative to this node.
    ///
    /// The empty path is this node.
    pub fn find(&self, path: &str) -> Option<&TreeData> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| {
            node.children()
                .iter()
                .find(|child| child.name == segment)
                .map(|child| &child.tree_data)
        })
    }

    /// Look up a procedure by dotted path relative to this node.
    pub fn find_procedure(&self, path: &str) -> BoardResult<&ProcedureNode> {
        match self.find(path) {
            Some(TreeData::Procedure(procedure)) => Ok(procedure),
            _ => Err(BoardError::not_found(path)),
        }
    }

    /// All procedures with their relative paths, in display order.
    pub fn procedures(&self) -> Vec<(String, &ProcedureNode)> {
        let mut out = Vec::new();
        self.collect_procedures("", &mut out);
        out
    }

    fn collect_procedures<'a>(&'a self, path: &str, out: &mut Vec<(String, &'a ProcedureNode)>) {
        match self {
            Self::Procedure(procedure) => out.push((path.to_string(), procedure)),
            Self::Router(router) => {
                for child in &router.children {
                    child
                        .tree_data
                        .collect_procedures(&join_path(path, &child.name), out);
                }
            }
        }
    }

    /// Check the structural invariants of a built tree.
    ///
    /// The root must be a router flagged `isRoot`, no other node may carry
    /// the flag, and child names must be unique per router.
    pub fn validate(&self) -> BoardResult<()> {
        match self {
            Self::Router(router) if router.is_root => {}
            _ => {
                return Err(BoardError::invalid_graph(
                    "tree root must be a router flagged isRoot",
                ))
            }
        }
        self.validate_children("")
    }

    fn validate_children(&self, path: &str) -> BoardResult<()> {
        let mut seen = HashSet::new();
        for child in self.children() {
            let child_path = join_path(path, &child.name);
            if !seen.insert(child.name.as_str()) {
                return Err(BoardError::invalid_graph(format!(
                    "duplicate child '{}'",
                    child.name
                ))
                .with_path(child_path));
            }
            if let TreeData::Router(router) = &child.tree_data {
                if router.is_root {
                    return Err(
                        BoardError::invalid_graph("only the root may be flagged isRoot")
                            .with_path(child_path),
                    );
                }
            }
            child.tree_data.validate_children(&child_path)?;
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a tree from JSON text.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let tree: Self = serde_json::from_str(json)?;
        tree.validate()?;
        Ok(tree)
    }
}

/// Builds [`TreeData`] from namespace nodes.
#[derive(Debug)]
pub struct TreeBuilder<'c> {
    config: &'c BoardConfig,
    resolver: Resolver<'c>,
}

impl<'c> TreeBuilder<'c> {
    /// Create a builder.
    pub fn new(config: &'c BoardConfig) -> Self {
        Self {
            config,
            resolver: Resolver::new(config),
        }
    }

    /// Recoverable conditions seen while building.
    pub fn diagnostics(&self) -> &[BoardError] {
        self.resolver.diagnostics()
    }

    /// Drain the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<BoardError> {
        self.resolver.take_diagnostics()
    }

    /// Build the tree rooted at `namespace`.
    #[tracing::instrument(skip_all, fields(max_depth = self.config.effective_max_depth()))]
    pub fn build<T: StructuralType>(&mut self, namespace: T) -> BoardResult<TreeData> {
        let children = self.build_children(namespace, "", 0)?;
        let tree = TreeData::Router(RouterNode {
            is_root: true,
            children,
        });
        tracing::debug!(
            procedures = tree.procedures().len(),
            diagnostics = self.diagnostics().len(),
            "operation tree built"
        );
        Ok(tree)
    }

    fn build_children<T: StructuralType>(
        &mut self,
        namespace: T,
        path: &str,
        depth: usize,
    ) -> BoardResult<Vec<TreeChild>> {
        let mut children = Vec::new();
        for member in namespace.properties() {
            let child_path = join_path(path, &member.name);
            let tree_data = self.build_node(member.ty, &child_path, depth + 1)?;
            children.push(TreeChild {
                name: member.name,
                tree_data,
            });
        }
        Ok(children)
    }

    fn build_node<T: StructuralType>(
        &mut self,
        node: T,
        path: &str,
        depth: usize,
    ) -> BoardResult<TreeData> {
        if node.property(&self.config.procedure_marker).is_some() {
            return self.build_procedure(node, path);
        }
        let max_depth = self.config.effective_max_depth();
        if depth > max_depth {
            tracing::warn!(
                path = %path,
                max_depth,
                "router nesting exceeds max depth, emitting placeholder"
            );
            self.resolver
                .record(BoardError::depth_exceeded(path, max_depth));
            return Ok(TreeData::placeholder());
        }
        let children = self.build_children(node, path, depth)?;
        Ok(TreeData::Router(RouterNode {
            is_root: false,
            children,
        }))
    }

    /// Missing members or an unresolvable signature yield a placeholder and a
    /// diagnostic instead of failing the build.
    fn build_procedure<T: StructuralType>(&mut self, node: T, path: &str) -> BoardResult<TreeData> {
        let input = node.property(INPUT_PROPERTY);
        let output = node.property(OUTPUT_PROPERTY);
        let kind = node.property(KIND_PROPERTY);

        let (Some(input), Some(output), Some(kind)) = (input, output, kind) else {
            let missing: Vec<&str> = [
                (INPUT_PROPERTY, input.is_none()),
                (OUTPUT_PROPERTY, output.is_none()),
                (KIND_PROPERTY, kind.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            let error = BoardError::malformed_operation(
                path,
                format!("procedure is missing {}", missing.join(", ")),
            );
            tracing::warn!(path = %path, missing = ?missing, "malformed procedure, emitting placeholder");
            self.resolver.record(error);
            return Ok(TreeData::placeholder());
        };

        let procedure_type = match kind.literal() {
            Some(crate::graph::LiteralKind::String("mutation")) => ProcedureType::Mutation,
            _ => ProcedureType::Query,
        };

        let (input_type, output_type) = match self.resolve_signature(input, output, path) {
            Ok(types) => types,
            Err(error) => {
                tracing::warn!(
                    path = %path,
                    error = %error,
                    "procedure signature unsupported, emitting placeholder"
                );
                self.resolver.record(error);
                return Ok(TreeData::placeholder());
            }
        };

        tracing::trace!(path = %path, kind = %procedure_type, "procedure resolved");

        Ok(TreeData::Procedure(ProcedureNode {
            procedure_type,
            input_type,
            output_type,
            input_type_string: input.type_string(),
            output_type_string: output.type_string(),
        }))
    }

    fn resolve_signature<T: StructuralType>(
        &mut self,
        input: T,
        output: T,
        path: &str,
    ) -> BoardResult<(ParsedType, ParsedType)> {
        let input_type = self
            .resolver
            .resolve(input, &join_path(path, INPUT_PROPERTY))?;
        let output_type = self
            .resolver
            .resolve(output, &join_path(path, OUTPUT_PROPERTY))?;
        Ok((input_type, output_type))
    }
}

/// Build a tree with a throwaway builder, discarding diagnostics.
pub fn build<T: StructuralType>(namespace: T, config: &BoardConfig) -> BoardResult<TreeData> {
    TreeBuilder::new(config).build(namespace)
}
