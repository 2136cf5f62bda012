//! Field classification
//!
//! [`describe_field`] turns one `(ParsedType, path)` pair into the descriptor
//! a form renders: what kind of input it is, its label, its default value and
//! the child slots of object fields. Descriptors are cheap and recomputed on
//! demand; nothing here touches the input store.

use crate::error::{BoardError, BoardResult};
use crate::parsed_type::ParsedType;
use crate::resolver::join_path;
use crate::value::InputValue;
use std::fmt;

/// Editable scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
}

impl ScalarKind {
    fn of(parsed: &ParsedType) -> Option<Self> {
        match parsed {
            ParsedType::String => Some(Self::String),
            ParsedType::Number => Some(Self::Number),
            ParsedType::Boolean => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Value a fresh, required field of this kind starts with.
    pub fn default_value(self) -> InputValue {
        match self {
            Self::String => InputValue::String(String::new()),
            Self::Number => InputValue::Number(0.0),
            Self::Boolean => InputValue::Bool(false),
        }
    }

    /// Returns true if `value` has this kind.
    pub fn accepts(self, value: &InputValue) -> bool {
        matches!(
            (self, value),
            (Self::String, InputValue::String(_))
                | (Self::Number, InputValue::Number(_))
                | (Self::Boolean, InputValue::Bool(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// The two absence markers an optional field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullish {
    Null,
    Undefined,
}

impl Nullish {
    fn of(parsed: &ParsedType) -> Option<Self> {
        match parsed {
            ParsedType::Null => Some(Self::Null),
            ParsedType::Undefined => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn value(self) -> InputValue {
        match self {
            Self::Null => InputValue::Null,
            Self::Undefined => InputValue::Undefined,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

/// One choice of an enum field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumOption {
    Null,
    Undefined,
    Literal(String),
}

impl EnumOption {
    pub fn value(&self) -> InputValue {
        match self {
            Self::Null => InputValue::Null,
            Self::Undefined => InputValue::Undefined,
            Self::Literal(s) => InputValue::String(s.clone()),
        }
    }

    /// The absence marker this option stands for, if any.
    pub fn nullish(&self) -> Option<Nullish> {
        match self {
            Self::Null => Some(Nullish::Null),
            Self::Undefined => Some(Nullish::Undefined),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for EnumOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Undefined => write!(f, "undefined"),
            Self::Literal(s) => write!(f, "{:?}", s),
        }
    }
}

/// How a field is presented and edited.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The procedure input itself
    RootObject,
    /// A nested record
    Object,
    /// A scalar, optionally paired with one absence marker
    Scalar {
        kind: ScalarKind,
        optional_type: Option<Nullish>,
    },
    /// A choice among absence markers and string literals
    Enum { options: Vec<EnumOption> },
}

impl Classification {
    /// Short name: `rootObject`, `object`, `string`, `number`, `boolean` or `enum`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RootObject => "rootObject",
            Self::Object => "object",
            Self::Scalar { kind, .. } => kind.as_str(),
            Self::Enum { .. } => "enum",
        }
    }

    /// Returns true for object classifications.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::RootObject | Self::Object)
    }

    /// Returns true if `value` may be stored for a field of this classification.
    pub fn accepts(&self, value: &InputValue) -> bool {
        match self {
            Self::RootObject | Self::Object => false,
            Self::Scalar {
                kind,
                optional_type,
            } => {
                kind.accepts(value)
                    || optional_type.is_some_and(|nullish| nullish.value() == *value)
            }
            Self::Enum { options } => options.iter().any(|option| option.value() == *value),
        }
    }

    /// The absence value a field of this classification can be cleared to.
    pub fn clear_value(&self) -> Option<InputValue> {
        match self {
            Self::Scalar {
                optional_type: Some(nullish),
                ..
            } => Some(nullish.value()),
            Self::Enum { options } => options
                .iter()
                .find_map(EnumOption::nullish)
                .map(Nullish::value),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar {
                kind,
                optional_type: Some(nullish),
            } => write!(f, "{} | {}", kind.as_str(), nullish.as_str()),
            Self::Enum { options } => {
                write!(f, "enum(")?;
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", option)?;
                }
                write!(f, ")")
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A child slot of an object field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildField {
    pub name: String,
    pub path: String,
    pub parsed_type: ParsedType,
}

/// Everything needed to render one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub path: String,
    pub label: String,
    pub classification: Classification,
    pub default_value: InputValue,
    pub children: Vec<ChildField>,
}

impl FieldDescriptor {
    /// Replace the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns true for fields that hold a value in the input store.
    pub fn is_leaf(&self) -> bool {
        !self.classification.is_object()
    }
}

/// Classify `parsed` as the field at `path`.
///
/// The label is the last path segment.
pub fn describe_field(parsed: &ParsedType, path: &str, is_root: bool) -> BoardResult<FieldDescriptor> {
    let label = path.rsplit('.').next().unwrap_or(path).to_string();
    let (classification, default_value, children) = match parsed {
        ParsedType::Object { properties } => {
            let classification = if is_root {
                Classification::RootObject
            } else {
                Classification::Object
            };
            let children = properties
                .iter()
                .map(|(name, ty)| ChildField {
                    name: name.clone(),
                    path: join_path(path, name),
                    parsed_type: ty.clone(),
                })
                .collect();
            (classification, InputValue::empty_record(), children)
        }
        ParsedType::String | ParsedType::Number | ParsedType::Boolean => {
            let kind = ScalarKind::of(parsed).ok_or_else(|| unsupported(parsed, path))?;
            let classification = Classification::Scalar {
                kind,
                optional_type: None,
            };
            (classification, kind.default_value(), Vec::new())
        }
        ParsedType::Union { options } => {
            let (classification, default_value) = classify_union(options, path)?;
            (classification, default_value, Vec::new())
        }
        other => return Err(unsupported(other, path)),
    };
    Ok(FieldDescriptor {
        path: path.to_string(),
        label,
        classification,
        default_value,
        children,
    })
}

fn classify_union(options: &[ParsedType], path: &str) -> BoardResult<(Classification, InputValue)> {
    if let [first, second] = options {
        let pair = match (Nullish::of(first), Nullish::of(second)) {
            (Some(nullish), None) => ScalarKind::of(second).map(|kind| (kind, nullish)),
            (None, Some(nullish)) => ScalarKind::of(first).map(|kind| (kind, nullish)),
            _ => None,
        };
        if let Some((kind, nullish)) = pair {
            let classification = Classification::Scalar {
                kind,
                optional_type: Some(nullish),
            };
            return Ok((classification, nullish.value()));
        }
    }

    let enumerable = options
        .iter()
        .all(|option| option.is_nullish() || option.as_string_literal().is_some());
    if enumerable && !options.is_empty() {
        let mut choices = Vec::new();
        if options.contains(&ParsedType::Null) {
            choices.push(EnumOption::Null);
        }
        if options.contains(&ParsedType::Undefined) {
            choices.push(EnumOption::Undefined);
        }
        choices.extend(
            options
                .iter()
                .filter_map(ParsedType::as_string_literal)
                .map(|literal| EnumOption::Literal(literal.to_string())),
        );
        let default_value = choices[0].value();
        return Ok((Classification::Enum { options: choices }, default_value));
    }

    Err(BoardError::unsupported_shape(
        path,
        "union",
        format!(
            "union {} is neither an optional scalar nor an enum",
            ParsedType::union(options.iter().cloned())
        ),
    ))
}

fn unsupported(parsed: &ParsedType, path: &str) -> BoardError {
    BoardError::unsupported_shape(
        path,
        parsed.tag(),
        format!("no input for type '{}'", parsed.tag()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardErrorCode;

    #[test]
    fn test_root_and_nested_objects() {
        let ty = ParsedType::object([
            ("name", ParsedType::String),
            ("inner", ParsedType::object([("flag", ParsedType::Boolean)])),
        ]);
        let root = describe_field(&ty, "root", true).unwrap();
        assert_eq!(root.classification, Classification::RootObject);
        assert_eq!(root.label, "root");
        assert_eq!(root.default_value, InputValue::empty_record());
        let paths: Vec<_> = root.children.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["root.name", "root.inner"]);

        let inner = describe_field(&root.children[1].parsed_type, "root.inner", false).unwrap();
        assert_eq!(inner.classification, Classification::Object);
        assert_eq!(inner.label, "inner");
    }

    #[test]
    fn test_scalar_defaults() {
        let cases = [
            (ParsedType::String, InputValue::String(String::new())),
            (ParsedType::Number, InputValue::Number(0.0)),
            (ParsedType::Boolean, InputValue::Bool(false)),
        ];
        for (ty, expected) in cases {
            let field = describe_field(&ty, "root.x", false).unwrap();
            assert_eq!(field.default_value, expected);
            assert!(field.is_leaf());
        }
    }

    #[test]
    fn test_optional_scalar_either_order() {
        let a = ParsedType::union([ParsedType::Undefined, ParsedType::Number]);
        let b = ParsedType::union([ParsedType::Number, ParsedType::Null]);
        let fa = describe_field(&a, "root.a", false).unwrap();
        let fb = describe_field(&b, "root.b", false).unwrap();
        assert_eq!(
            fa.classification,
            Classification::Scalar {
                kind: ScalarKind::Number,
                optional_type: Some(Nullish::Undefined)
            }
        );
        assert_eq!(fa.default_value, InputValue::Undefined);
        assert_eq!(fb.default_value, InputValue::Null);
        assert_eq!(fb.classification.to_string(), "number | null");
    }

    #[test]
    fn test_enum_orders_null_then_undefined_then_literals() {
        let ty = ParsedType::union([
            ParsedType::string_literal("a"),
            ParsedType::Undefined,
            ParsedType::string_literal("b"),
            ParsedType::Null,
        ]);
        let field = describe_field(&ty, "root.e", false).unwrap();
        assert_eq!(
            field.classification,
            Classification::Enum {
                options: vec![
                    EnumOption::Null,
                    EnumOption::Undefined,
                    EnumOption::Literal("a".into()),
                    EnumOption::Literal("b".into()),
                ]
            }
        );
        assert_eq!(field.default_value, InputValue::Null);
        assert_eq!(field.classification.clear_value(), Some(InputValue::Null));
    }

    #[test]
    fn test_enum_keeps_repeated_literals() {
        let ty = ParsedType::union([
            ParsedType::string_literal("a"),
            ParsedType::string_literal("b"),
            ParsedType::string_literal("a"),
        ]);
        let field = describe_field(&ty, "root.e", false).unwrap();
        assert_eq!(
            field.classification,
            Classification::Enum {
                options: vec![
                    EnumOption::Literal("a".into()),
                    EnumOption::Literal("b".into()),
                    EnumOption::Literal("a".into()),
                ]
            }
        );
        assert_eq!(field.default_value, InputValue::String("a".into()));
    }

    #[test]
    fn test_unsupported_shapes_name_tag_and_path() {
        let date = describe_field(&ParsedType::Date, "root.when", false).unwrap_err();
        assert_eq!(date.code, BoardErrorCode::UnsupportedShape);
        assert_eq!(date.tag.as_deref(), Some("Date"));
        assert_eq!(date.path.as_deref(), Some("root.when"));

        let mixed = ParsedType::union([ParsedType::String, ParsedType::Number]);
        let err = describe_field(&mixed, "root.m", false).unwrap_err();
        assert_eq!(err.tag.as_deref(), Some("union"));

        let optional_date = ParsedType::union([ParsedType::Date, ParsedType::Undefined]);
        assert!(describe_field(&optional_date, "root.d", false).is_err());
    }

    #[test]
    fn test_classification_accepts() {
        let optional = Classification::Scalar {
            kind: ScalarKind::String,
            optional_type: Some(Nullish::Undefined),
        };
        assert!(optional.accepts(&InputValue::from("x")));
        assert!(optional.accepts(&InputValue::Undefined));
        assert!(!optional.accepts(&InputValue::Null));
        assert!(!optional.accepts(&InputValue::from(1.0)));
        assert!(!Classification::Object.accepts(&InputValue::empty_record()));
    }
}
