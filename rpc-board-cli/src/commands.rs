//! Command logic shared by the binary and the integration tests.
//!
//! Each command returns a report; printing is left to `main.rs`.

use crate::error::{CliError, CliResult};
use rpc_board::{
    BoardConfig, BoardError, MountedField, ProcedureForm, ProcedureType, TreeBuilder, TreeData,
    TypeGraph,
};
use serde_json::Value;

/// Outcome of `rpc-board build`.
#[derive(Debug)]
pub struct BuildReport {
    /// The validated tree.
    pub tree: TreeData,
    /// Pretty JSON of the tree artifact.
    pub json: String,
    /// Recoverable problems met while building.
    pub diagnostics: Vec<BoardError>,
}

impl BuildReport {
    /// Number of procedures in the built tree.
    pub fn procedure_count(&self) -> usize {
        self.tree.procedures().len()
    }
}

/// Load a type graph, build its operation tree and validate the artifact.
///
/// A tree that fails validation is a [`CliError::Validation`].
#[tracing::instrument(skip_all, fields(bytes = graph_json.len()))]
pub fn build_tree(graph_json: &str, config: &BoardConfig) -> CliResult<BuildReport> {
    let graph = TypeGraph::from_json(graph_json)?;
    let mut builder = TreeBuilder::new(config);
    let tree = builder.build(graph.root_ref()?)?;
    let diagnostics = builder.take_diagnostics();

    tree.validate()
        .map_err(|e| CliError::Validation(e.to_string()))?;
    let json = tree.to_json_pretty()?;

    Ok(BuildReport {
        tree,
        json,
        diagnostics,
    })
}

/// One mounted field as printed by `rpc-board describe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub path: String,
    pub classification: String,
    /// Rendered default, `None` for objects.
    pub default: Option<String>,
}

/// A field that could not be mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLine {
    pub path: String,
    pub message: String,
}

/// Outcome of `rpc-board describe`.
#[derive(Debug)]
pub struct FormReport {
    pub procedure: String,
    pub procedure_type: ProcedureType,
    pub input_type: String,
    pub fields: Vec<FieldLine>,
    pub failures: Vec<FailureLine>,
    /// The value the form would send with every field at its default.
    pub payload: Value,
}

/// Open a form session for `procedure` in a tree artifact and report it.
///
/// The session is unmounted before returning.
#[tracing::instrument(skip(tree_json, config))]
pub fn describe_procedure(
    tree_json: &str,
    procedure: &str,
    config: &BoardConfig,
) -> CliResult<FormReport> {
    let tree = TreeData::from_json(tree_json)?;
    let node = tree.find_procedure(procedure)?;
    let form = ProcedureForm::open(&node.input_type, &config.root_path)?;

    let mut fields = Vec::new();
    let mut failures = Vec::new();
    for field in form.root().walk() {
        match field {
            MountedField::Leaf(descriptor) => fields.push(FieldLine {
                path: descriptor.path.clone(),
                classification: descriptor.classification.to_string(),
                default: Some(descriptor.default_value.to_string()),
            }),
            MountedField::Object { descriptor, .. } => fields.push(FieldLine {
                path: descriptor.path.clone(),
                classification: descriptor.classification.to_string(),
                default: None,
            }),
            MountedField::Failed { path, error } => failures.push(FailureLine {
                path: path.clone(),
                message: error.message.clone(),
            }),
        }
    }

    let payload = form.payload()?;
    form.unmount()?;

    Ok(FormReport {
        procedure: procedure.to_string(),
        procedure_type: node.procedure_type,
        input_type: node.input_type_string.clone(),
        fields,
        failures,
        payload,
    })
}
