//! Deep equality and memoized field descriptors
//!
//! A form re-describes a field only when its props actually changed. Props
//! are compared structurally with [`deep_equal`]: records by key set and
//! value (key order ignored), lists element-wise, dates by instant.

use crate::error::BoardResult;
use crate::field::{describe_field, FieldDescriptor};
use crate::parsed_type::{LiteralValue, ParsedType};
use crate::value::InputValue;

/// Structural equality.
pub trait DeepEqual {
    fn deep_equal(&self, other: &Self) -> bool;
}

/// Compare two values with [`DeepEqual`].
pub fn deep_equal<T: DeepEqual + ?Sized>(a: &T, b: &T) -> bool {
    a.deep_equal(b)
}

impl DeepEqual for InputValue {
    fn deep_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_equal(y))
            }
            (Self::Record(a), Self::Record(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.deep_equal(y)))
            }
            _ => false,
        }
    }
}

impl DeepEqual for ParsedType {
    fn deep_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => literal_equal(a, b),
            (Self::Object { properties: a }, Self::Object { properties: b }) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.deep_equal(y)))
            }
            (
                Self::Index {
                    index_type: ak,
                    indexed_type: av,
                },
                Self::Index {
                    index_type: bk,
                    indexed_type: bv,
                },
            ) => ak.deep_equal(bk) && av.deep_equal(bv),
            (Self::Union { options: a }, Self::Union { options: b }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_equal(y))
            }
            (Self::Unknown { kind: a }, Self::Unknown { kind: b }) => a == b,
            (a, b) => a.tag() == b.tag() && !matches!(a, Self::Literal(_)),
        }
    }
}

fn literal_equal(a: &LiteralValue, b: &LiteralValue) -> bool {
    match (a, b) {
        (LiteralValue::String(x), LiteralValue::String(y)) => x == y,
        (LiteralValue::Number(x), LiteralValue::Number(y)) => x == y,
        (LiteralValue::Boolean(x), LiteralValue::Boolean(y)) => x == y,
        (LiteralValue::BigInt(x), LiteralValue::BigInt(y)) => x == y,
        _ => false,
    }
}

/// Inputs of one field render.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProps {
    pub parsed_type: ParsedType,
    pub path: String,
    pub is_root: bool,
    pub label: String,
}

impl DeepEqual for FieldProps {
    fn deep_equal(&self, other: &Self) -> bool {
        self.path == other.path
            && self.is_root == other.is_root
            && self.label == other.label
            && self.parsed_type.deep_equal(&other.parsed_type)
    }
}

/// Caches the descriptor of one field across renders.
#[derive(Debug, Default)]
pub struct FieldMemo {
    cached: Option<(FieldProps, BoardResult<FieldDescriptor>)>,
    rebuilds: usize,
}

impl FieldMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for `props`, rebuilt only if they differ from the last call.
    pub fn describe(&mut self, props: FieldProps) -> &BoardResult<FieldDescriptor> {
        let entry = match self.cached.take() {
            Some((previous, descriptor)) if previous.deep_equal(&props) => (previous, descriptor),
            _ => {
                self.rebuilds += 1;
                let descriptor = describe_field(&props.parsed_type, &props.path, props.is_root)
                    .map(|d| d.with_label(props.label.clone()));
                (props, descriptor)
            }
        };
        let (_, descriptor) = self.cached.insert(entry);
        descriptor
    }

    /// How many times the descriptor was rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
