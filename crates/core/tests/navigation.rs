mod common;

use common::{rel, workspace};
use wayfinder_api::{ApiError, NavigationService, PositionQuery, SymbolKind, TypeHintProvider};

const SHAPES: &str = "export interface Shape {
  area(): number;
}
export class Circle implements Shape {
  area(): number { return 1; }
}
";

const RING: &str = "import { Circle } from './shapes';
export class Ring extends Circle {
  area(): number { return 2; }
}
";

#[tokio::test]
async fn test_definition_across_files() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "export function f() {}\n"),
        ("b.ts", "import { f } from './a';\nf();\n"),
    ]);
    let def = handle
        .go_to_definition(&PositionQuery::new("b.ts", 2, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(def.name, "f");
    assert_eq!(def.kind, SymbolKind::Function);
    assert_eq!(rel(&handle, &def.location.path), "a.ts");
    assert_eq!(def.location.start_line, 1);
}

#[tokio::test]
async fn test_definition_prefers_imported_file() {
    let (_dir, handle) = workspace(&[
        ("main.ts", "import { helper } from './util';\nhelper();\n"),
        ("other.ts", "export function helper() { return 0; }\n"),
        ("util.ts", "export function helper() { return 1; }\n"),
    ]);
    let def = handle
        .go_to_definition(&PositionQuery::new("main.ts", 2, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rel(&handle, &def.location.path), "util.ts");
}

#[tokio::test]
async fn test_definition_prefers_top_level_in_origin() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "function helper() {}\nhelper();\n"),
        ("b.ts", "export function helper() {}\n"),
    ]);
    let def = handle
        .go_to_definition(&PositionQuery::new("a.ts", 2, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rel(&handle, &def.location.path), "a.ts");
}

#[tokio::test]
async fn test_imported_name_beats_local_method() {
    let (_dir, handle) = workspace(&[
        (
            "main.ts",
            "import { f } from './zlib';\nclass X {\n  f() {}\n}\nf();\n",
        ),
        ("zlib.ts", "export function f() {}\n"),
    ]);
    let def = handle
        .go_to_definition(&PositionQuery::new("main.ts", 5, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rel(&handle, &def.location.path), "zlib.ts");
    assert_eq!(def.kind, SymbolKind::Function);
}

#[tokio::test]
async fn test_definition_of_whitespace_is_none() {
    let (_dir, handle) = workspace(&[("a.ts", "const a = 1;\n\n")]);
    let def = handle
        .go_to_definition(&PositionQuery::new("a.ts", 2, 1))
        .await
        .unwrap();
    assert!(def.is_none());
}

#[tokio::test]
async fn test_zero_line_is_invalid() {
    let (_dir, handle) = workspace(&[("a.ts", "const a = 1;\n")]);
    let err = handle
        .go_to_definition(&PositionQuery::new("a.ts", 0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidParams(_)));
}

#[tokio::test]
async fn test_interface_implementations() {
    let (_dir, handle) = workspace(&[("ring.ts", RING), ("shapes.ts", SHAPES)]);
    let impls = handle
        .find_implementations(&PositionQuery::new("shapes.ts", 1, 18))
        .await
        .unwrap();
    let names: Vec<&str> = impls.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Circle"]);
    assert_eq!(impls[0].kind, SymbolKind::Class);
}

#[tokio::test]
async fn test_derived_classes() {
    let (_dir, handle) = workspace(&[("ring.ts", RING), ("shapes.ts", SHAPES)]);
    let derived = handle
        .find_derived_classes(&PositionQuery::new("shapes.ts", 4, 14))
        .await
        .unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].name, "Ring");
    assert_eq!(rel(&handle, &derived[0].location.path), "ring.ts");
}

#[tokio::test]
async fn test_method_implementations_in_other_classes() {
    let (_dir, handle) = workspace(&[("ring.ts", RING), ("shapes.ts", SHAPES)]);
    let impls = handle
        .find_implementations(&PositionQuery::new("shapes.ts", 5, 3))
        .await
        .unwrap();
    assert_eq!(impls.len(), 1);
    assert_eq!(impls[0].container_name.as_deref(), Some("Ring"));
}

#[tokio::test]
async fn test_derived_classes_of_non_class_is_empty() {
    let (_dir, handle) = workspace(&[("ring.ts", RING), ("shapes.ts", SHAPES)]);
    let derived = handle
        .find_derived_classes(&PositionQuery::new("shapes.ts", 1, 18))
        .await
        .unwrap();
    assert!(derived.is_empty());
}

#[tokio::test]
async fn test_type_hint_at_cursor() {
    let (_dir, handle) = workspace(&[(
        "math.ts",
        concat!(
            "export function add(a: number, b: number): number {\n",
            "  return a + b;\n",
            "}\n",
            "export const label = 'sum';\n",
        ),
    )]);
    let add = handle
        .infer_type_hint(&PositionQuery::new("math.ts", 1, 17))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(add.name, "add");
    assert_eq!(add.primary_type(), Some("number"));
    assert!(!add.inferred);

    let label = handle
        .infer_type_hint(&PositionQuery::new("math.ts", 4, 14))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label.declared_type.as_deref(), Some("string"));
    assert!(label.inferred);
}
