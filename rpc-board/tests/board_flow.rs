//! End-to-end tests: type graph file to tree, board and forms.

use rpc_board::prelude::*;
use rpc_board::{outline, Badge, BoardErrorCode};
use serde_json::json;

const APP_ROUTER: &str = include_str!("fixtures/app_router.json");
const MALFORMED_ROUTER: &str = include_str!("fixtures/malformed_router.json");

fn app_tree() -> TreeData {
    let graph = TypeGraph::from_json(APP_ROUTER).unwrap();
    let config = BoardConfig::default();
    TreeBuilder::new(&config)
        .build(graph.root_ref().unwrap())
        .unwrap()
}

#[test]
fn builds_app_router_tree() {
    let tree = app_tree();
    tree.validate().unwrap();

    let paths: Vec<_> = tree.procedures().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["greeting", "add", "r.nested"]);

    let add = tree.find_procedure("add").unwrap();
    assert_eq!(add.procedure_type, ProcedureType::Mutation);
    assert_eq!(
        add.input_type_string,
        "{ weirdDate: { hello: number; }; optionalDate?: Date; record: Record<string, number>; }"
    );
    assert_eq!(
        serde_json::to_value(&add.input_type).unwrap(),
        json!({
            "type": "object",
            "properties": {
                "weirdDate": {
                    "type": "object",
                    "properties": { "hello": { "type": "number" } }
                },
                "optionalDate": {
                    "type": "union",
                    "options": [{ "type": "Date" }, { "type": "undefined" }]
                },
                "record": {
                    "type": "index",
                    "indexType": { "type": "string" },
                    "indexedType": { "type": "number" }
                }
            }
        })
    );

    let greeting = tree.find_procedure("greeting").unwrap();
    assert_eq!(greeting.procedure_type, ProcedureType::Query);
    assert_eq!(greeting.input_type, ParsedType::Void);
    assert_eq!(
        greeting.output_type_string,
        "{ a: Date; r: Record<string, number>; }"
    );

    let nested = tree.find_procedure("r.nested").unwrap();
    assert_eq!(nested.input_type_string, "{ readonly b: 5; }");
    assert_eq!(
        nested.output_type,
        ParsedType::union([
            ParsedType::object([("a", ParsedType::Number)]),
            ParsedType::object([("d", ParsedType::String)]),
        ])
    );
}

#[test]
fn tree_artifact_roundtrips_through_json() {
    let tree = app_tree();
    let json = tree.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["__board_type"], json!("router"));
    assert_eq!(value["isRoot"], json!(true));
    assert_eq!(value["children"][2]["treeData"].get("isRoot"), None);
    assert_eq!(TreeData::from_json(&json).unwrap(), tree);
}

#[test]
fn add_form_mounts_three_fields_and_unmounts_clean() {
    let tree = app_tree();
    let add = tree.find_procedure("add").unwrap();
    let mut form = ProcedureForm::open(&add.input_type, "root").unwrap();

    let MountedField::Object { descriptor, children } = form.root() else {
        panic!("expected the add input to mount as an object");
    };
    assert_eq!(descriptor.classification, Classification::RootObject);
    let names: Vec<_> = children.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["weirdDate", "optionalDate", "record"]);

    let failures: Vec<_> = form
        .root()
        .failures()
        .into_iter()
        .map(|e| (e.path.clone().unwrap(), e.tag.clone().unwrap()))
        .collect();
    assert_eq!(
        failures,
        vec![
            ("root.optionalDate".to_string(), "union".to_string()),
            ("root.record".to_string(), "index".to_string()),
        ]
    );

    assert_eq!(form.root().leaf_paths(), vec!["root.weirdDate.hello"]);
    assert_eq!(form.store().len(), 1);
    form.set_value("root.weirdDate.hello", InputValue::from(4.0))
        .unwrap();
    assert_eq!(form.payload().unwrap(), json!({ "weirdDate": { "hello": 4.0 } }));

    form.unmount().unwrap();
}

#[test]
fn malformed_sibling_does_not_abort_build() {
    let graph = TypeGraph::from_json(MALFORMED_ROUTER).unwrap();
    let config = BoardConfig::default();
    let mut builder = TreeBuilder::new(&config);
    let tree = builder.build(graph.root_ref().unwrap()).unwrap();

    assert!(tree.find_procedure("good").is_ok());
    let broken = tree.find("broken").unwrap();
    assert!(broken.is_router());
    assert!(broken.children().is_empty());

    let diagnostics = builder.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, BoardErrorCode::MalformedOperation);
    assert!(diagnostics[0].is_recoverable());
}

#[test]
fn board_walkthrough() {
    let mut board = Board::new(app_tree(), BoardConfig::default()).unwrap();
    assert_eq!(board.open_forms(), vec!["root.greeting"]);

    let frames = board.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].badge, Badge::Query);
    assert!(frames[0].expanded);
    assert_eq!(frames[1].badge, Badge::Mutation);
    assert_eq!(frames[2].badge, Badge::Router);
    drop(frames);

    assert!(board.toggle("root.r").unwrap());
    assert!(board.toggle("root.r.nested").unwrap());
    assert_eq!(
        outline(&board.frames()),
        vec![
            "* [Query] greeting",
            "- [Mutation] add",
            "v [Router] r",
            "   * [Query] nested",
        ]
    );

    let nested = board.form("root.r.nested").unwrap();
    let failure = &nested.root().failures()[0];
    assert_eq!(failure.path.as_deref(), Some("root.b"));
    assert_eq!(failure.tag.as_deref(), Some("literal"));

    assert!(!board.toggle("root.greeting").unwrap());
    assert_eq!(board.open_forms(), vec!["root.r.nested"]);
    board.close().unwrap();
}
