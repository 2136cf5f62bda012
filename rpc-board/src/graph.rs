//! Structural type graphs
//!
//! The resolver works against the [`StructuralType`] capability trait rather
//! than any particular compiler. [`TypeGraph`] is the bundled implementation:
//! an arena of [`GraphNode`]s addressed by [`TypeId`] handles, loadable from
//! JSON. Because nodes refer to each other by id, self-referential types are
//! expressible; termination is the resolver's depth bound, not cycle detection.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "root": 0,
//!   "nodes": [
//!     { "kind": "object", "properties": [{ "name": "name", "type": 1 }] },
//!     { "kind": "string" }
//!   ]
//! }
//! ```

use crate::error::{BoardError, BoardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Maximum nesting rendered by [`TypeGraph::type_string`] before eliding.
const TYPE_STRING_DEPTH: usize = 8;

// ============================================================================
// Capability trait
// ============================================================================

/// Primitive kinds a structural type node may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    BigInt,
    Boolean,
    Undefined,
    Void,
    Null,
}

/// Literal kinds a structural type node may have.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind<'a> {
    String(&'a str),
    Number(f64),
    Boolean(bool),
    /// Decimal text, not validated here
    BigInt(&'a str),
}

/// One own property of an object-like node.
#[derive(Debug, Clone)]
pub struct Member<T> {
    pub name: String,
    pub ty: T,
    pub optional: bool,
}

/// What the resolver needs to know about a type node.
///
/// Implementations are cheap handles (`Copy` views into some type store).
pub trait StructuralType: Sized + Copy {
    /// Kind tag used for the `unknown` sentinel and diagnostics.
    fn kind_name(&self) -> String;

    /// Primitive kind, if any.
    fn primitive(&self) -> Option<Primitive>;

    /// Literal value, if any.
    fn literal(&self) -> Option<LiteralKind<'_>>;

    /// Union constituents in source order, if this is a union.
    fn union_members(&self) -> Option<Vec<Self>>;

    /// Declared symbol name (used to recognize opaque wrappers).
    fn symbol_name(&self) -> Option<&str>;

    /// True for object-like nodes whose properties can be enumerated.
    fn is_object(&self) -> bool;

    /// Index signatures as `(key, value)` pairs in declaration order.
    fn index_signatures(&self) -> Vec<(Self, Self)>;

    /// Own properties in type-system order.
    fn properties(&self) -> Vec<Member<Self>>;

    /// Human-readable type string.
    fn type_string(&self) -> String;

    /// Look up an own property by name.
    fn property(&self, name: &str) -> Option<Self> {
        self.properties()
            .into_iter()
            .find(|member| member.name == name)
            .map(|member| member.ty)
    }
}

// ============================================================================
// Arena graph
// ============================================================================

/// Handle of a node inside a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A property declaration of an object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// An index signature declaration of an object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSignatureDecl {
    pub key: TypeId,
    pub value: TypeId,
}

/// Shape of a node, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeShape {
    String,
    Number,
    #[serde(rename = "bigint")]
    BigInt,
    Boolean,
    Undefined,
    Void,
    Null,
    StringLiteral {
        value: String,
    },
    NumberLiteral {
        value: f64,
    },
    #[serde(rename = "bigintLiteral")]
    BigIntLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    Union {
        types: Vec<TypeId>,
    },
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        #[serde(default)]
        properties: Vec<PropertyDecl>,
        #[serde(rename = "indexSignatures", default, skip_serializing_if = "Vec::is_empty")]
        index_signatures: Vec<IndexSignatureDecl>,
    },
    /// A named type the graph does not describe structurally
    Other {
        name: String,
    },
}

impl NodeShape {
    /// The `kind` tag of this shape.
    pub fn kind(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Null => "null",
            Self::StringLiteral { .. } => "stringLiteral",
            Self::NumberLiteral { .. } => "numberLiteral",
            Self::BigIntLiteral { .. } => "bigintLiteral",
            Self::BooleanLiteral { .. } => "booleanLiteral",
            Self::Union { .. } => "union",
            Self::Object { .. } => "object",
            Self::Other { .. } => "other",
        }
    }

    /// An anonymous object with the given properties.
    pub fn object(properties: Vec<PropertyDecl>) -> Self {
        Self::Object {
            symbol: None,
            properties,
            index_signatures: Vec::new(),
        }
    }

    /// Every id this shape refers to.
    fn references(&self) -> Vec<TypeId> {
        match self {
            Self::Union { types } => types.clone(),
            Self::Object {
                properties,
                index_signatures,
                ..
            } => properties
                .iter()
                .map(|p| p.ty)
                .chain(index_signatures.iter().flat_map(|s| [s.key, s.value]))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A node of the graph: its shape and an optional display override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl From<NodeShape> for GraphNode {
    fn from(shape: NodeShape) -> Self {
        Self {
            shape,
            display: None,
        }
    }
}

/// Arena of type nodes with a designated root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    pub root: TypeId,
    pub nodes: Vec<GraphNode>,
}

impl Default for TypeId {
    fn default() -> Self {
        Self(0)
    }
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a graph from JSON text.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let graph: Self = serde_json::from_str(json)
            .map_err(|e| BoardError::invalid_graph(format!("malformed type graph: {}", e)))?;
        graph.validate()?;
        Ok(graph)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a node and return its handle.
    pub fn push(&mut self, node: impl Into<GraphNode>) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node.into());
        id
    }

    /// Replace the shape of an existing node (used to tie recursive knots).
    pub fn set_shape(&mut self, id: TypeId, shape: NodeShape) -> BoardResult<()> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or_else(|| BoardError::invalid_graph(format!("no node {}", id)))?;
        node.shape = shape;
        Ok(())
    }

    /// Designate the root node.
    pub fn set_root(&mut self, id: TypeId) {
        self.root = id;
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn node(&self, id: TypeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    /// A [`StructuralType`] view of the root node.
    pub fn root_ref(&self) -> BoardResult<TypeRef<'_>> {
        self.get(self.root)
    }

    /// A [`StructuralType`] view of `id`.
    pub fn get(&self, id: TypeId) -> BoardResult<TypeRef<'_>> {
        let node = self
            .node(id)
            .ok_or_else(|| BoardError::invalid_graph(format!("no node {}", id)))?;
        Ok(TypeRef {
            graph: self,
            id,
            node,
        })
    }

    /// Check every id reference and property-name uniqueness.
    pub fn validate(&self) -> BoardResult<()> {
        if self.node(self.root).is_none() {
            return Err(BoardError::invalid_graph(format!(
                "root {} is out of range ({} nodes)",
                self.root,
                self.nodes.len()
            )));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            for reference in node.shape.references() {
                if self.node(reference).is_none() {
                    return Err(BoardError::invalid_graph(format!(
                        "node #{} ({}) refers to missing node {}",
                        index,
                        node.shape.kind(),
                        reference
                    )));
                }
            }
            if let NodeShape::Object { properties, .. } = &node.shape {
                let mut seen = HashSet::new();
                for property in properties {
                    if !seen.insert(property.name.as_str()) {
                        return Err(BoardError::invalid_graph(format!(
                            "node #{} declares property '{}' twice",
                            index, property.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Render the type string of `id`.
    ///
    /// A node's `display` wins; otherwise the string is synthesized. Named
    /// objects render as their symbol, so only anonymous recursion can hit
    /// the elision depth.
    pub fn type_string(&self, id: TypeId) -> String {
        self.render(id, 0)
    }

    fn render(&self, id: TypeId, depth: usize) -> String {
        let Some(node) = self.node(id) else {
            return "never".to_string();
        };
        if let Some(display) = &node.display {
            return display.clone();
        }
        if depth >= TYPE_STRING_DEPTH {
            return "...".to_string();
        }
        match &node.shape {
            NodeShape::StringLiteral { value } => format!("{:?}", value),
            NodeShape::NumberLiteral { value } => value.to_string(),
            NodeShape::BigIntLiteral { value } => format!("{}n", value),
            NodeShape::BooleanLiteral { value } => value.to_string(),
            NodeShape::Union { types } => types
                .iter()
                .map(|t| self.render(*t, depth + 1))
                .collect::<Vec<_>>()
                .join(" | "),
            NodeShape::Object {
                symbol: Some(symbol),
                ..
            } => symbol.clone(),
            NodeShape::Object {
                symbol: None,
                properties,
                index_signatures,
            } => {
                if properties.is_empty() && index_signatures.is_empty() {
                    return "{}".to_string();
                }
                let mut out = String::from("{ ");
                for signature in index_signatures {
                    out.push_str(&format!(
                        "[key: {}]: {}; ",
                        self.render(signature.key, depth + 1),
                        self.render(signature.value, depth + 1)
                    ));
                }
                for property in properties {
                    out.push_str(&format!(
                        "{}{}: {}; ",
                        property.name,
                        if property.optional { "?" } else { "" },
                        self.render(property.ty, depth + 1)
                    ));
                }
                out.push('}');
                out
            }
            NodeShape::Other { name } => name.clone(),
            primitive => primitive.kind().to_string(),
        }
    }
}

/// Borrowed view of one node, implementing [`StructuralType`].
#[derive(Debug, Clone, Copy)]
pub struct TypeRef<'g> {
    graph: &'g TypeGraph,
    id: TypeId,
    node: &'g GraphNode,
}

impl<'g> TypeRef<'g> {
    /// The node's id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The node's shape.
    pub fn shape(&self) -> &'g NodeShape {
        &self.node.shape
    }

    // Ids were checked by `validate`; a dangling id is skipped rather than panicking.
    fn follow(&self, id: TypeId) -> Option<TypeRef<'g>> {
        self.graph.get(id).ok()
    }
}

impl<'g> StructuralType for TypeRef<'g> {
    fn kind_name(&self) -> String {
        match &self.node.shape {
            NodeShape::Other { name } => name.clone(),
            shape => shape.kind().to_string(),
        }
    }

    fn primitive(&self) -> Option<Primitive> {
        match self.node.shape {
            NodeShape::String => Some(Primitive::String),
            NodeShape::Number => Some(Primitive::Number),
            NodeShape::BigInt => Some(Primitive::BigInt),
            NodeShape::Boolean => Some(Primitive::Boolean),
            NodeShape::Undefined => Some(Primitive::Undefined),
            NodeShape::Void => Some(Primitive::Void),
            NodeShape::Null => Some(Primitive::Null),
            _ => None,
        }
    }

    fn literal(&self) -> Option<LiteralKind<'_>> {
        match &self.node.shape {
            NodeShape::StringLiteral { value } => Some(LiteralKind::String(value)),
            NodeShape::NumberLiteral { value } => Some(LiteralKind::Number(*value)),
            NodeShape::BooleanLiteral { value } => Some(LiteralKind::Boolean(*value)),
            NodeShape::BigIntLiteral { value } => Some(LiteralKind::BigInt(value)),
            _ => None,
        }
    }

    fn union_members(&self) -> Option<Vec<Self>> {
        match &self.node.shape {
            NodeShape::Union { types } => {
                Some(types.iter().filter_map(|id| self.follow(*id)).collect())
            }
            _ => None,
        }
    }

    fn symbol_name(&self) -> Option<&str> {
        match &self.node.shape {
            NodeShape::Object { symbol, .. } => symbol.as_deref(),
            NodeShape::Other { name } => Some(name),
            _ => None,
        }
    }

    fn is_object(&self) -> bool {
        matches!(self.node.shape, NodeShape::Object { .. })
    }

    fn index_signatures(&self) -> Vec<(Self, Self)> {
        match &self.node.shape {
            NodeShape::Object {
                index_signatures, ..
            } => index_signatures
                .iter()
                .filter_map(|s| Some((self.follow(s.key)?, self.follow(s.value)?)))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn properties(&self) -> Vec<Member<Self>> {
        match &self.node.shape {
            NodeShape::Object { properties, .. } => properties
                .iter()
                .filter_map(|p| {
                    Some(Member {
                        name: p.name.clone(),
                        ty: self.follow(p.ty)?,
                        optional: p.optional,
                    })
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn type_string(&self) -> String {
        self.graph.type_string(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_graph() {
        let json = r#"{
            "root": 0,
            "nodes": [
                { "kind": "object", "properties": [
                    { "name": "name", "type": 1 },
                    { "name": "age", "type": 2, "optional": true }
                ] },
                { "kind": "string" },
                { "kind": "number", "display": "Age" }
            ]
        }"#;
        let graph = TypeGraph::from_json(json).unwrap();
        let root = graph.root_ref().unwrap();
        let props = root.properties();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "name");
        assert!(props[1].optional);
        assert_eq!(graph.type_string(graph.root), "{ name: string; age?: Age; }");
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let json = r#"{"root":0,"nodes":[{"kind":"union","types":[0,7]}]}"#;
        let err = TypeGraph::from_json(json).unwrap_err();
        assert_eq!(err.code, crate::BoardErrorCode::InvalidGraph);
        assert!(err.message.contains("#7"));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let json = r#"{"root":0,"nodes":[
            {"kind":"object","properties":[{"name":"a","type":1},{"name":"a","type":1}]},
            {"kind":"string"}
        ]}"#;
        let err = TypeGraph::from_json(json).unwrap_err();
        assert!(err.message.contains("twice"));
    }

    #[test]
    fn test_root_out_of_range_rejected() {
        let err = TypeGraph::from_json(r#"{"root":3,"nodes":[]}"#).unwrap_err();
        assert_eq!(err.code, crate::BoardErrorCode::InvalidGraph);
    }

    #[test]
    fn test_literal_kinds_parse() {
        let json = r#"{"root":0,"nodes":[
            {"kind":"union","types":[1,2,3,4]},
            {"kind":"stringLiteral","value":"a"},
            {"kind":"numberLiteral","value":5},
            {"kind":"booleanLiteral","value":true},
            {"kind":"bigintLiteral","value":"10"}
        ]}"#;
        let graph = TypeGraph::from_json(json).unwrap();
        assert_eq!(graph.type_string(graph.root), "\"a\" | 5 | true | 10n");
        let members = graph.root_ref().unwrap().union_members().unwrap();
        assert_eq!(members[1].literal(), Some(LiteralKind::Number(5.0)));
    }

    #[test]
    fn test_self_reference_renders_bounded() {
        let mut graph = TypeGraph::new();
        let node = graph.push(NodeShape::object(Vec::new()));
        graph
            .set_shape(
                node,
                NodeShape::object(vec![PropertyDecl {
                    name: "next".into(),
                    ty: node,
                    optional: false,
                }]),
            )
            .unwrap();
        graph.set_root(node);
        assert!(graph.validate().is_ok());
        assert!(graph.type_string(node).contains("..."));
    }

    #[test]
    fn test_graph_json_roundtrip() {
        let mut graph = TypeGraph::new();
        let s = graph.push(NodeShape::String);
        let obj = graph.push(GraphNode {
            shape: NodeShape::Object {
                symbol: Some("Date".into()),
                properties: Vec::new(),
                index_signatures: vec![IndexSignatureDecl { key: s, value: s }],
            },
            display: None,
        });
        graph.set_root(obj);
        let json = graph.to_json().unwrap();
        assert_eq!(TypeGraph::from_json(&json).unwrap(), graph);
    }
}
