//! Property-based tests for type resolution and the IR encoding

use super::strategies::{arb_parsed_type, self_referential_graph};
use crate::graph::{NodeShape, PropertyDecl, TypeGraph};
use crate::parsed_type::{BigIntText, ParsedType};
use crate::resolver::{resolve, Resolver};
use crate::{BoardConfig, BoardErrorCode};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Resolving the same node twice yields identical trees.
    #[test]
    fn prop_resolve_is_deterministic(max_depth in 1usize..12) {
        let graph = self_referential_graph();
        let config = BoardConfig::default().with_max_depth(max_depth);
        let first = resolve(graph.root_ref().unwrap(), &config).unwrap();
        let second = resolve(graph.root_ref().unwrap(), &config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A self-referential type terminates for every depth bound, with the
    /// sentinel exactly one level past the bound.
    #[test]
    fn prop_depth_bound_terminates(max_depth in 1usize..40) {
        let graph = self_referential_graph();
        let config = BoardConfig::default().with_max_depth(max_depth);
        let mut resolver = Resolver::new(&config);
        let parsed = resolver.resolve(graph.root_ref().unwrap(), "").unwrap();

        prop_assert_eq!(parsed.depth(), max_depth + 2);
        prop_assert_eq!(resolver.diagnostics().len(), 1);
        prop_assert_eq!(resolver.diagnostics()[0].code, BoardErrorCode::DepthExceeded);

        let mut node = &parsed;
        for _ in 0..=max_depth {
            match node {
                ParsedType::Object { properties } => {
                    prop_assert_eq!(&properties["value"], &ParsedType::String);
                    node = &properties["next"];
                }
                other => prop_assert!(false, "expected object, got {:?}", other),
            }
        }
        prop_assert_eq!(node, &ParsedType::Unknown { kind: "object".into() });
    }

    /// Every IR tree survives a JSON round-trip unchanged.
    #[test]
    fn prop_parsed_type_json_roundtrip(ty in arb_parsed_type()) {
        let json = serde_json::to_string(&ty).unwrap();
        let restored: ParsedType = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, ty);
    }

    /// Bigint text encoding and decoding are inverses.
    #[test]
    fn prop_bigint_text_roundtrip(n in any::<i128>()) {
        let text = BigIntText::from_i128(n);
        let parsed = BigIntText::parse(text.as_str()).unwrap();
        prop_assert_eq!(parsed.as_str().parse::<i128>().unwrap(), n);
        let json = serde_json::to_string(&text).unwrap();
        prop_assert_eq!(serde_json::from_str::<BigIntText>(&json).unwrap(), text);
    }

    /// Leading zeros are never accepted.
    #[test]
    fn prop_bigint_text_rejects_leading_zero(digits in "[0-9]{1,20}") {
        let padded = format!("0{}", digits);
        prop_assert!(BigIntText::parse(&padded).is_err());
    }

    /// Union constituents keep their order and duplicates.
    #[test]
    fn prop_union_preserves_order(kinds in prop::collection::vec(0u8..4, 1..6)) {
        let mut graph = TypeGraph::new();
        let shapes = [NodeShape::String, NodeShape::Number, NodeShape::Null, NodeShape::Undefined];
        let expected_of = [ParsedType::String, ParsedType::Number, ParsedType::Null, ParsedType::Undefined];
        let ids: Vec<_> = kinds.iter().map(|k| graph.push(shapes[*k as usize].clone())).collect();
        let union = graph.push(NodeShape::Union { types: ids });
        graph.set_root(union);

        let parsed = resolve(graph.root_ref().unwrap(), &BoardConfig::default()).unwrap();
        let expected = ParsedType::union(kinds.iter().map(|k| expected_of[*k as usize].clone()));
        prop_assert_eq!(parsed, expected);
    }
}

#[test]
fn test_optional_opaque_property_is_date_or_undefined() {
    let mut graph = TypeGraph::new();
    let date = graph.push(NodeShape::Other {
        name: "Date".into(),
    });
    let root = graph.push(NodeShape::object(vec![PropertyDecl {
        name: "optionalDate".into(),
        ty: date,
        optional: true,
    }]));
    graph.set_root(root);

    let parsed = resolve(graph.root_ref().unwrap(), &BoardConfig::default()).unwrap();
    assert_eq!(
        parsed,
        ParsedType::object([(
            "optionalDate",
            ParsedType::union([ParsedType::Date, ParsedType::Undefined])
        )])
    );
}

#[test]
fn test_depth_one_sentinel_directly_below_root_children() {
    let graph = self_referential_graph();
    let config = BoardConfig::default().with_max_depth(1);
    let parsed = resolve(graph.root_ref().unwrap(), &config).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(
        json["properties"]["next"]["properties"]["next"],
        serde_json::json!({"type": "unknown", "kind": "object"})
    );
}

#[test]
fn test_oversized_depth_bound_is_capped() {
    let graph = self_referential_graph();
    let config = BoardConfig::default().with_max_depth(1_000_000);
    assert!(config.validate().is_err());

    let mut resolver = Resolver::new(&config);
    let parsed = resolver.resolve(graph.root_ref().unwrap(), "").unwrap();
    assert_eq!(parsed.depth(), crate::MAX_DEPTH_LIMIT + 2);
    assert_eq!(resolver.diagnostics().len(), 1);
    assert_eq!(resolver.diagnostics()[0].code, BoardErrorCode::DepthExceeded);
}
