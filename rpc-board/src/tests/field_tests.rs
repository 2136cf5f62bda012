//! Property-based tests for field classification

use super::strategies::{arb_nullish, arb_scalar};
use crate::field::{describe_field, Classification, EnumOption, Nullish, ScalarKind};
use crate::parsed_type::ParsedType;
use crate::value::InputValue;
use crate::{deep_equal, BoardErrorCode};
use proptest::prelude::*;

fn nullish_of(ty: &ParsedType) -> Nullish {
    match ty {
        ParsedType::Null => Nullish::Null,
        _ => Nullish::Undefined,
    }
}

fn scalar_of(ty: &ParsedType) -> ScalarKind {
    match ty {
        ParsedType::String => ScalarKind::String,
        ParsedType::Number => ScalarKind::Number,
        _ => ScalarKind::Boolean,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A two-option union of one scalar and one absence marker is that
    /// scalar, optional, defaulting to the absence marker, in either order.
    #[test]
    fn prop_optional_scalar_heuristic(
        scalar in arb_scalar(),
        nullish in arb_nullish(),
        nullish_first in any::<bool>()
    ) {
        let options = if nullish_first {
            vec![nullish.clone(), scalar.clone()]
        } else {
            vec![scalar.clone(), nullish.clone()]
        };
        let field = describe_field(&ParsedType::Union { options }, "root.x", false).unwrap();
        prop_assert_eq!(
            field.classification,
            Classification::Scalar {
                kind: scalar_of(&scalar),
                optional_type: Some(nullish_of(&nullish)),
            }
        );
        prop_assert_eq!(field.default_value, nullish_of(&nullish).value());
    }

    /// String-literal unions are enums defaulting to their first literal.
    #[test]
    fn prop_enum_heuristic(literals in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let ty = ParsedType::union(literals.iter().map(|l| ParsedType::string_literal(l.as_str())));
        let field = describe_field(&ty, "root.e", false).unwrap();
        let Classification::Enum { options } = &field.classification else {
            return Err(TestCaseError::fail("expected enum"));
        };
        prop_assert_eq!(&options[0], &EnumOption::Literal(literals[0].clone()));
        prop_assert_eq!(field.default_value, InputValue::String(literals[0].clone()));
    }

    /// Adding null puts it first and makes it the default.
    #[test]
    fn prop_enum_with_null_defaults_to_null(
        literals in prop::collection::vec("[a-z]{1,6}", 1..6),
        position in 0usize..6
    ) {
        let mut options: Vec<ParsedType> = literals
            .iter()
            .map(|l| ParsedType::string_literal(l.as_str()))
            .collect();
        options.insert(position.min(options.len()), ParsedType::Null);
        let field = describe_field(&ParsedType::Union { options }, "root.e", false).unwrap();
        let Classification::Enum { options } = &field.classification else {
            return Err(TestCaseError::fail("expected enum"));
        };
        prop_assert_eq!(&options[0], &EnumOption::Null);
        prop_assert_eq!(field.default_value, InputValue::Null);
    }

    /// Unions mixing two scalars never classify.
    #[test]
    fn prop_scalar_pairs_are_unsupported(a in arb_scalar(), b in arb_scalar()) {
        let err = describe_field(&ParsedType::union([a, b]), "root.u", false).unwrap_err();
        prop_assert_eq!(err.code, BoardErrorCode::UnsupportedShape);
        prop_assert_eq!(err.tag.as_deref(), Some("union"));
        prop_assert_eq!(err.path.as_deref(), Some("root.u"));
    }

    /// Describing is a pure function of its inputs.
    #[test]
    fn prop_describe_is_deterministic(scalar in arb_scalar(), nullish in arb_nullish()) {
        let ty = ParsedType::object([("x", ParsedType::union([scalar, nullish]))]);
        let a = describe_field(&ty, "root", true).unwrap();
        let b = describe_field(&ty, "root", true).unwrap();
        prop_assert!(deep_equal(&a.default_value, &b.default_value));
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_enum_examples() {
    let ab = ParsedType::union([ParsedType::string_literal("a"), ParsedType::string_literal("b")]);
    let field = describe_field(&ab, "root.e", false).unwrap();
    assert_eq!(
        field.classification,
        Classification::Enum {
            options: vec![EnumOption::Literal("a".into()), EnumOption::Literal("b".into())]
        }
    );
    assert_eq!(field.default_value, InputValue::from("a"));

    let with_null = ParsedType::union([
        ParsedType::Null,
        ParsedType::string_literal("a"),
        ParsedType::string_literal("b"),
    ]);
    let field = describe_field(&with_null, "root.e", false).unwrap();
    assert_eq!(
        field.classification,
        Classification::Enum {
            options: vec![
                EnumOption::Null,
                EnumOption::Literal("a".into()),
                EnumOption::Literal("b".into())
            ]
        }
    );
    assert_eq!(field.default_value, InputValue::Null);
}

#[test]
fn test_optional_string_example() {
    let ty = ParsedType::union([ParsedType::String, ParsedType::Undefined]);
    let field = describe_field(&ty, "root.x", false).unwrap();
    assert_eq!(field.classification.name(), "string");
    assert_eq!(field.default_value, InputValue::Undefined);
}
