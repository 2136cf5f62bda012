//! Portable type IR
//!
//! [`ParsedType`] is the closed set of shapes the resolver produces. It is a
//! plain tagged tree (discriminant field `type`) that serializes to JSON and
//! back without loss. `bigint` literal values travel as validated decimal
//! text, see [`BigIntText`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical description of a structural type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParsedType {
    /// Primitive string
    #[serde(rename = "string")]
    String,
    /// Primitive number
    #[serde(rename = "number")]
    Number,
    /// Primitive bigint
    #[serde(rename = "bigint")]
    BigInt,
    /// Primitive boolean
    #[serde(rename = "boolean")]
    Boolean,
    /// Absence marker `null`
    #[serde(rename = "null")]
    Null,
    /// Absence marker `undefined`
    #[serde(rename = "undefined")]
    Undefined,
    /// Absence marker `void`
    #[serde(rename = "void")]
    Void,
    /// A single concrete value
    #[serde(rename = "literal")]
    Literal(LiteralValue),
    /// A record with ordered, uniquely named properties
    #[serde(rename = "object")]
    Object {
        /// Properties in type-system order
        properties: IndexMap<String, ParsedType>,
    },
    /// A dynamic-key mapping
    #[serde(rename = "index")]
    Index {
        /// Key type
        #[serde(rename = "indexType")]
        index_type: Box<ParsedType>,
        /// Value type
        #[serde(rename = "indexedType")]
        indexed_type: Box<ParsedType>,
    },
    /// Ordered alternation, duplicates allowed, never empty
    #[serde(rename = "union")]
    Union {
        /// Constituents in source order
        options: Vec<ParsedType>,
    },
    /// Opaque date wrapper
    #[serde(rename = "Date")]
    Date,
    /// Sentinel for nodes beyond the resolver depth bound
    #[serde(rename = "unknown")]
    Unknown {
        /// Kind tag of the node that was not resolved
        kind: String,
    },
}

impl ParsedType {
    /// The discriminant string of this node.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Literal(_) => "literal",
            Self::Object { .. } => "object",
            Self::Index { .. } => "index",
            Self::Union { .. } => "union",
            Self::Date => "Date",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Build an object from `(name, type)` pairs, keeping their order.
    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ParsedType)>,
    {
        Self::Object {
            properties: properties
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        }
    }

    /// Build a union from its options.
    pub fn union(options: impl IntoIterator<Item = ParsedType>) -> Self {
        Self::Union {
            options: options.into_iter().collect(),
        }
    }

    /// Build an index mapping.
    pub fn index(index_type: ParsedType, indexed_type: ParsedType) -> Self {
        Self::Index {
            index_type: Box::new(index_type),
            indexed_type: Box::new(indexed_type),
        }
    }

    /// Build a string literal.
    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::Literal(LiteralValue::String(value.into()))
    }

    /// Build a number literal.
    pub fn number_literal(value: f64) -> Self {
        Self::Literal(LiteralValue::Number(value))
    }

    /// Build a boolean literal.
    pub fn boolean_literal(value: bool) -> Self {
        Self::Literal(LiteralValue::Boolean(value))
    }

    /// Returns true for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Returns true for the scalars a text-like field can edit.
    pub fn is_editable_scalar(&self) -> bool {
        matches!(self, Self::String | Self::Number | Self::Boolean)
    }

    /// Returns the string value of a string literal.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(LiteralValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Nesting depth of this node (leaves are 1).
    pub fn depth(&self) -> usize {
        let children = match self {
            Self::Object { properties } => properties.values().map(Self::depth).max(),
            Self::Index {
                index_type,
                indexed_type,
            } => Some(index_type.depth().max(indexed_type.depth())),
            Self::Union { options } => options.iter().map(Self::depth).max(),
            _ => None,
        };
        1 + children.unwrap_or(0)
    }
}

impl fmt::Display for ParsedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{}", value),
            Self::Object { properties } => {
                if properties.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (name, ty) in properties {
                    write!(f, "{}: {}; ", name, ty)?;
                }
                write!(f, "}}")
            }
            Self::Index {
                index_type,
                indexed_type,
            } => write!(f, "{{ [key: {}]: {}; }}", index_type, indexed_type),
            Self::Union { options } => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", option)?;
                }
                Ok(())
            }
            Self::Unknown { kind } => write!(f, "unknown<{}>", kind),
            other => write!(f, "{}", other.tag()),
        }
    }
}

/// Value of a `literal` node, tagged by `literalType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "literalType", content = "literalValue", rename_all = "lowercase")]
pub enum LiteralValue {
    /// String literal
    String(String),
    /// Number literal
    Number(f64),
    /// Boolean literal
    Boolean(bool),
    /// Bigint literal carried as decimal text
    BigInt(BigIntText),
}

impl LiteralValue {
    /// The `literalType` string of this value.
    pub fn literal_type(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::BigInt(_) => "bigint",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{:?}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::BigInt(value) => write!(f, "{}n", value),
        }
    }
}

/// Textual encoding of a bigint literal.
///
/// Accepted form: optional `-`, then ASCII digits without leading zeros.
/// `"0"` is the only zero; `"-0"` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BigIntText(String);

impl BigIntText {
    /// Parse and validate a decimal bigint string.
    pub fn parse(text: &str) -> Result<Self, BigIntTextError> {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() {
            return Err(BigIntTextError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(BigIntTextError::InvalidCharacter(bad));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(BigIntTextError::LeadingZero);
        }
        if digits == "0" && text.starts_with('-') {
            return Err(BigIntTextError::NegativeZero);
        }
        Ok(Self(text.to_string()))
    }

    /// Encode an `i128` value.
    pub fn from_i128(value: i128) -> Self {
        Self(value.to_string())
    }

    /// The validated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BigIntText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BigIntText {
    type Error = BigIntTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BigIntText> for String {
    fn from(value: BigIntText) -> Self {
        value.0
    }
}

/// Reasons a bigint text is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BigIntTextError {
    /// No digits
    #[error("bigint text has no digits")]
    Empty,
    /// A character other than an ASCII digit
    #[error("bigint text contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// Digits start with zero
    #[error("bigint text has a leading zero")]
    LeadingZero,
    /// `-0`
    #[error("bigint text encodes negative zero")]
    NegativeZero,
}
