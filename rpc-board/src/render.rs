//! Tree rendering
//!
//! [`render_tree`] walks a [`TreeData`] together with a [`VisibilityStore`]
//! and produces presentation frames. The root router is never shown; its
//! children are the first level. Expanded routers list their children,
//! expanded procedures hold a [`FormSlot`] instead.

use crate::config::BoardConfig;
use crate::parsed_type::ParsedType;
use crate::resolver::join_path;
use crate::tree::{ProcedureNode, ProcedureType, TreeData};
use crate::visibility::VisibilityStore;
use std::fmt;

/// Label shown next to a frame's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    Router,
    Query,
    Mutation,
}

impl Badge {
    fn of(node: &TreeData) -> Self {
        match node {
            TreeData::Router(_) => Self::Router,
            TreeData::Procedure(procedure) => match procedure.procedure_type {
                ProcedureType::Query => Self::Query,
                ProcedureType::Mutation => Self::Mutation,
            },
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Router => write!(f, "Router"),
            Self::Query => write!(f, "Query"),
            Self::Mutation => write!(f, "Mutation"),
        }
    }
}

/// Where an expanded procedure's form is mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSlot<'t> {
    pub path: String,
    pub input_type: &'t ParsedType,
    pub input_type_string: &'t str,
}

/// What an expanded frame shows below its header.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody<'t> {
    Collapsed,
    Children(Vec<Frame<'t>>),
    Form(FormSlot<'t>),
}

/// One row of the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'t> {
    pub name: String,
    pub path: String,
    pub badge: Badge,
    pub indent: u32,
    pub expanded: bool,
    pub child_count: usize,
    pub body: FrameBody<'t>,
}

impl<'t> Frame<'t> {
    /// Child frames of an expanded router.
    pub fn children(&self) -> &[Frame<'t>] {
        match &self.body {
            FrameBody::Children(children) => children,
            _ => &[],
        }
    }

    /// The form slot of an expanded procedure.
    pub fn form(&self) -> Option<&FormSlot<'t>> {
        match &self.body {
            FrameBody::Form(slot) => Some(slot),
            _ => None,
        }
    }
}

/// Render the first level of `tree`.
pub fn render_tree<'t>(
    tree: &'t TreeData,
    visibility: &VisibilityStore,
    config: &BoardConfig,
) -> Vec<Frame<'t>> {
    render_children(tree, &config.root_path, 0, visibility, config)
}

fn render_children<'t>(
    node: &'t TreeData,
    path: &str,
    level: u32,
    visibility: &VisibilityStore,
    config: &BoardConfig,
) -> Vec<Frame<'t>> {
    node.children()
        .iter()
        .map(|child| {
            let child_path = join_path(path, &child.name);
            render_frame(&child.name, &child.tree_data, child_path, level, visibility, config)
        })
        .collect()
}

fn render_frame<'t>(
    name: &str,
    node: &'t TreeData,
    path: String,
    level: u32,
    visibility: &VisibilityStore,
    config: &BoardConfig,
) -> Frame<'t> {
    let expanded = visibility.is_open(&path);
    let body = match (node, expanded) {
        (_, false) => FrameBody::Collapsed,
        (TreeData::Router(_), true) => {
            FrameBody::Children(render_children(node, &path, level + 1, visibility, config))
        }
        (TreeData::Procedure(procedure), true) => FrameBody::Form(form_slot(&path, procedure)),
    };
    Frame {
        name: name.to_string(),
        badge: Badge::of(node),
        indent: level * config.indent_step,
        expanded,
        child_count: node.children().len(),
        body,
        path,
    }
}

fn form_slot<'t>(path: &str, procedure: &'t ProcedureNode) -> FormSlot<'t> {
    FormSlot {
        path: path.to_string(),
        input_type: &procedure.input_type,
        input_type_string: &procedure.input_type_string,
    }
}

/// Plain-text outline of `frames`, one line per visible row.
pub fn outline(frames: &[Frame<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for frame in frames {
        let marker = match (&frame.badge, frame.expanded) {
            (Badge::Router, true) => "v",
            (Badge::Router, false) => ">",
            (_, true) => "*",
            (_, false) => "-",
        };
        lines.push(format!(
            "{}{} [{}] {}",
            " ".repeat(frame.indent as usize / 10),
            marker,
            frame.badge,
            frame.name
        ));
        lines.extend(outline(frame.children()));
    }
    lines
}
